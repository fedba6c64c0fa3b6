use zedis::{commands::CommandError, zset::ZSetError};

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_zcount_command() {
    let env = TestEnv::new();

    env.exec_command_immediate_success_response(
        TestUtils::zadd_command(
            "fruit",
            &[("1", "apple"), ("2", "banana"), ("2", "blueberry"), ("3", "cherry")],
        ),
        &TestUtils::expected_integer(4),
    )
    .await;

    let test_cases = vec![
        (
            TestUtils::zcount_command("fruit", "-inf", "+inf"),
            Ok(TestUtils::expected_integer(4)),
        ),
        (
            TestUtils::zcount_command("fruit", "2", "2"),
            Ok(TestUtils::expected_integer(2)),
        ),
        (
            TestUtils::zcount_command("fruit", "(1", "(3"),
            Ok(TestUtils::expected_integer(2)),
        ),
        (
            TestUtils::zcount_command("fruit", "(2", "(3"),
            Ok(TestUtils::expected_integer(0)),
        ),
        (
            TestUtils::zcount_command("fruit", "3", "1"),
            Ok(TestUtils::expected_integer(0)),
        ),
        (
            TestUtils::zcount_command("missing", "-inf", "+inf"),
            Ok(TestUtils::expected_integer(0)),
        ),
        (
            TestUtils::zcount_command("fruit", "(", "3"),
            Err(CommandError::SortedSet(ZSetError::InvalidBorder(
                "(".to_string(),
            ))),
        ),
    ];

    for (command, expected_result) in test_cases {
        let result = env.exec_command(command.clone()).await;
        assert_eq!(result, expected_result, "executing {:?}", command);
    }
}
