//! A registration workflow tested against spied collaborators.
//!
//! The client is a set of generated spies; every draw of the fixture gives a
//! client with different (but per-draw consistent) behaviour together with
//! the logs of every call the workflow made through it.

mod common;

use common::{init_test_logging, seeded_config};
use spyglass::{
    AsyncSpyFn, CallLog, FromRecord, Generator, Outcome, SpyFn, SpyingArbitrary, arb_spy_async_fn,
    arb_spy_fn, bools, check_async_with_config, elements, field, int_range, just, one_of, record,
    strings, to_arbitrary, weighted,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Response<T> {
    data: T,
    status: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ValidationError {
    TooShort,
    NoNumber,
    NoSpecialChar,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct User {
    username: String,
    email: String,
    password: String,
}

type Availability = Response<bool>;

#[derive(Debug, Clone, FromRecord)]
struct UserClient {
    check_username: AsyncSpyFn<(String,), Availability, Availability>,
    create_user: AsyncSpyFn<(User,), Response<()>, Response<u32>>,
    validate_password: SpyFn<(String,), Option<ValidationError>>,
}

#[derive(Debug, Clone, FromRecord)]
struct ClientLog {
    check_username: CallLog<(String,), Outcome<Availability, Availability>>,
    create_user: CallLog<(User,), Outcome<Response<()>, Response<u32>>>,
    validate_password: CallLog<(String,), Option<ValidationError>>,
}

#[derive(Debug, Clone, PartialEq)]
enum Registration {
    Registered { user_id: u32 },
    UsernameTaken,
    InvalidPassword(ValidationError),
}

#[derive(Debug, Clone, PartialEq)]
enum ClientError {
    CheckUsername(Availability),
    CreateUser(Response<()>),
}

async fn register_user(client: &UserClient, user: &User) -> Result<Registration, ClientError> {
    let available = client
        .check_username
        .call((user.username.clone(),))
        .await
        .map_err(ClientError::CheckUsername)?;
    if !available.data {
        return Ok(Registration::UsernameTaken);
    }

    if let Some(error) = client.validate_password.call((user.password.clone(),)) {
        return Ok(Registration::InvalidPassword(error));
    }

    let created = client
        .create_user
        .call((user.clone(),))
        .await
        .map_err(ClientError::CreateUser)?;
    Ok(Registration::Registered {
        user_id: created.data,
    })
}

fn arb_user_client() -> SpyingArbitrary<ClientLog, UserClient> {
    let password_checks = one_of(vec![
        weighted(4, just(None).boxed()),
        weighted(
            1,
            elements(vec![
                ValidationError::TooShort,
                ValidationError::NoNumber,
                ValidationError::NoSpecialChar,
            ])
            .map(Some)
            .boxed(),
        ),
    ]);

    record(vec![
        field(
            "check_username",
            arb_spy_async_fn::<(String,), _, _>(
                just(Response {
                    data: false,
                    status: 500,
                }),
                bools().map(|data| Response { data, status: 200 }),
            ),
        ),
        field(
            "create_user",
            arb_spy_async_fn::<(User,), _, _>(
                just(Response {
                    data: (),
                    status: 400,
                }),
                int_range(1u32, u32::MAX).map(|data| Response { data, status: 201 }),
            ),
        ),
        field(
            "validate_password",
            arb_spy_fn::<(String,), _>(password_checks),
        ),
    ])
    .typed()
}

fn users() -> impl Generator<Value = User> + Send + Sync + 'static {
    strings(3, 12)
        .zip(strings(3, 12))
        .zip(strings(1, 8))
        .map(|((username, password), mailbox)| User {
            username,
            email: format!("{mailbox}@example.com"),
            password,
        })
}

#[tokio::test]
async fn test_registration_ties_every_outcome_to_a_cause() {
    init_test_logging();

    let result = check_async_with_config(
        users().zip(to_arbitrary(arb_user_client())),
        |(user, (log, client)): (User, (ClientLog, UserClient))| async move {
            let result = register_user(&client, &user).await;

            // Every call carried the right input
            if let Some(call) = log.check_username.get(0) {
                assert_eq!(call.args.0, user.username);
            }
            if let Some(call) = log.validate_password.get(0) {
                assert_eq!(call.args.0, user.password);
            }
            if let Some(call) = log.create_user.get(0) {
                assert_eq!(call.args.0, user);
            }

            match result {
                Ok(Registration::Registered { user_id }) => {
                    assert_eq!(
                        log.check_username.results(),
                        vec![Outcome::Success(Response {
                            data: true,
                            status: 200
                        })]
                    );
                    assert_eq!(log.validate_password.results(), vec![None]);
                    assert_eq!(
                        log.create_user.results(),
                        vec![Outcome::Success(Response {
                            data: user_id,
                            status: 201
                        })]
                    );
                }
                Ok(Registration::UsernameTaken) => {
                    let availability = log.check_username.last().map(|call| call.result);
                    assert!(matches!(
                        availability,
                        Some(Outcome::Success(Response { data: false, .. }))
                    ));
                    assert!(log.validate_password.is_empty());
                    assert!(log.create_user.is_empty());
                }
                Ok(Registration::InvalidPassword(error)) => {
                    assert_eq!(log.validate_password.results(), vec![Some(error)]);
                    assert!(log.create_user.is_empty());
                }
                Err(ClientError::CheckUsername(response)) => {
                    assert_eq!(
                        log.check_username.results(),
                        vec![Outcome::Failure(response)]
                    );
                    assert!(log.validate_password.is_empty());
                    assert!(log.create_user.is_empty());
                }
                Err(ClientError::CreateUser(response)) => {
                    assert_eq!(log.create_user.results(), vec![Outcome::Failure(response)]);
                }
            }
        },
        seeded_config(200),
    )
    .await;

    assert!(result.is_ok(), "{:?}", result.err());
}

#[tokio::test]
async fn test_every_path_is_reachable() {
    init_test_logging();

    let generator = users().zip(to_arbitrary(arb_user_client()));
    let mut rng = spyglass::create_seeded_rng(common::DEFAULT_TEST_SEED);
    let config = spyglass::GeneratorConfig::default();

    let mut seen = [false; 5];
    for _ in 0..500 {
        let (user, (_, client)) = generator.generate(&mut rng, &config);
        let path = match register_user(&client, &user).await {
            Ok(Registration::Registered { .. }) => 0,
            Ok(Registration::UsernameTaken) => 1,
            Ok(Registration::InvalidPassword(_)) => 2,
            Err(ClientError::CheckUsername(_)) => 3,
            Err(ClientError::CreateUser(_)) => 4,
        };
        seen[path] = true;
    }
    assert_eq!(seen, [true; 5]);
}
