use zedis::commands::CommandError;

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_set_command_overwrites() {
    let env = TestEnv::new();

    env.exec_command_immediate_success_response(
        TestUtils::zadd_command("fruit", &[("1", "apple")]),
        &TestUtils::expected_integer(1),
    )
    .await;

    env.exec_command_immediate_success_response(
        TestUtils::set_command("fruit", "banana"),
        &TestUtils::expected_simple_string("OK"),
    )
    .await;

    env.exec_command_immediate_success_response(
        TestUtils::type_command("fruit"),
        &TestUtils::expected_simple_string("string"),
    )
    .await;

    env.exec_command_immediate_success_response(
        TestUtils::get_command("fruit"),
        &TestUtils::expected_bulk_string("banana"),
    )
    .await;
}

#[tokio::test]
async fn test_handle_set_command_invalid() {
    let env = TestEnv::new();

    let test_cases = vec![
        TestUtils::command("SET", &["fruit"]),
        TestUtils::command("SET", &["fruit", "banana", "PX", "100"]),
    ];

    for command in test_cases {
        env.exec_command_immediate_error_response(
            command,
            CommandError::WrongNumberOfArguments("set".to_string()),
        )
        .await;
    }
}
