use zedis::commands::CommandError;

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_zremrangebyscore_command() {
    let env = TestEnv::new();

    env.exec_command_immediate_success_response(
        TestUtils::zadd_command(
            "fruit",
            &[
                ("1", "apple"),
                ("2", "banana"),
                ("3", "cherry"),
                ("4", "date"),
                ("5", "elderberry"),
            ],
        ),
        &TestUtils::expected_integer(5),
    )
    .await;

    let test_cases = vec![
        (
            TestUtils::zremrangebyscore_command("fruit", "(1", "3"),
            Ok(TestUtils::expected_integer(2)),
        ),
        (
            TestUtils::zrange_command("fruit", 0, -1),
            Ok(TestUtils::expected_bulk_string_array(&["apple", "date", "elderberry"])),
        ),
        (
            TestUtils::zremrangebyscore_command("fruit", "6", "+inf"),
            Ok(TestUtils::expected_integer(0)),
        ),
        (
            TestUtils::zremrangebyscore_command("fruit", "4", "2"),
            Ok(TestUtils::expected_integer(0)),
        ),
        (
            TestUtils::command("ZREMRANGEBYSCORE", &["fruit", "1"]),
            Err(CommandError::WrongNumberOfArguments(
                "zremrangebyscore".to_string(),
            )),
        ),
        (
            TestUtils::zremrangebyscore_command("fruit", "-inf", "+inf"),
            Ok(TestUtils::expected_integer(3)),
        ),
        (
            TestUtils::type_command("fruit"),
            Ok(TestUtils::expected_simple_string("none")),
        ),
    ];

    for (command, expected_result) in test_cases {
        let result = env.exec_command(command.clone()).await;
        assert_eq!(result, expected_result, "executing {:?}", command);
    }
}
