use zedis::{
    commands::CommandError,
    key_value_store::StoreError,
};

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_zadd_command() {
    let env = TestEnv::new();

    env.exec_command_immediate_success_response(
        TestUtils::zadd_command("fruit", &[("1", "apple"), ("2", "banana")]),
        &TestUtils::expected_integer(2),
    )
    .await;

    // Only cherry is new; apple moves.
    env.exec_command_immediate_success_response(
        TestUtils::zadd_command("fruit", &[("3", "apple"), ("1.5", "cherry")]),
        &TestUtils::expected_integer(1),
    )
    .await;

    env.exec_command_immediate_success_response(
        TestUtils::zrange_command_with_scores("fruit", 0, -1),
        &TestUtils::expected_bulk_string_array(&[
            "cherry", "1.5", "banana", "2", "apple", "3",
        ]),
    )
    .await;
}

#[tokio::test]
async fn test_handle_zadd_command_same_member_twice() {
    let env = TestEnv::new();

    env.exec_command_immediate_success_response(
        TestUtils::zadd_command("fruit", &[("1", "apple"), ("2", "apple")]),
        &TestUtils::expected_integer(1),
    )
    .await;

    env.exec_command_immediate_success_response(
        TestUtils::zscore_command("fruit", "apple"),
        &TestUtils::expected_bulk_string("2"),
    )
    .await;
}

#[tokio::test]
async fn test_handle_zadd_command_infinite_scores() {
    let env = TestEnv::new();

    env.exec_command_immediate_success_response(
        TestUtils::zadd_command("fruit", &[("+inf", "top"), ("-inf", "bottom"), ("0", "zero")]),
        &TestUtils::expected_integer(3),
    )
    .await;

    env.exec_command_immediate_success_response(
        TestUtils::zrange_command_with_scores("fruit", 0, -1),
        &TestUtils::expected_bulk_string_array(&[
            "bottom", "-inf", "zero", "0", "top", "inf",
        ]),
    )
    .await;
}

#[tokio::test]
async fn test_handle_zadd_command_invalid() {
    let env = TestEnv::new();

    let test_cases = vec![
        (
            TestUtils::command("ZADD", &["fruit"]),
            CommandError::WrongNumberOfArguments("zadd".to_string()),
        ),
        (
            TestUtils::command("ZADD", &["fruit", "1"]),
            CommandError::WrongNumberOfArguments("zadd".to_string()),
        ),
        (
            TestUtils::command("ZADD", &["fruit", "1", "apple", "2"]),
            CommandError::SyntaxError,
        ),
        (
            TestUtils::zadd_command("fruit", &[("one", "apple")]),
            CommandError::InvalidFloat,
        ),
        (
            TestUtils::zadd_command("fruit", &[("1", "apple"), ("nan", "pear")]),
            CommandError::InvalidFloat,
        ),
    ];

    for (command, expected_error) in test_cases {
        env.exec_command_immediate_error_response(command, expected_error)
            .await;
    }

    // A rejected command writes nothing, not even the first valid pair.
    env.exec_command_immediate_success_response(
        TestUtils::type_command("fruit"),
        &TestUtils::expected_simple_string("none"),
    )
    .await;
}

#[tokio::test]
async fn test_handle_zadd_command_wrong_type() {
    let env = TestEnv::new();

    env.exec_command_immediate_success_response(
        TestUtils::set_command("name", "grape"),
        &TestUtils::expected_simple_string("OK"),
    )
    .await;

    env.exec_command_immediate_error_response(
        TestUtils::zadd_command("name", &[("1", "apple")]),
        CommandError::Store(StoreError::WrongType),
    )
    .await;

    env.exec_command_immediate_success_response(
        TestUtils::get_command("name"),
        &TestUtils::expected_bulk_string("grape"),
    )
    .await;
}
