use zedis::commands::CommandError;

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_ping_command() {
    let env = TestEnv::new();

    env.exec_command_immediate_success_response(
        TestUtils::ping_command(),
        &TestUtils::expected_simple_string("PONG"),
    )
    .await;

    env.exec_command_immediate_success_response(
        TestUtils::command("ping", &["hello"]),
        &TestUtils::expected_bulk_string("hello"),
    )
    .await;
}

#[tokio::test]
async fn test_handle_ping_command_too_many_arguments() {
    let env = TestEnv::new();

    env.exec_command_immediate_error_response(
        TestUtils::command("PING", &["a", "b"]),
        CommandError::WrongNumberOfArguments("ping".to_string()),
    )
    .await;
}
