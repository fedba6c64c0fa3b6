use zedis::commands::CommandError;

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_bgrewriteaof_without_append_only_file() {
    let env = TestEnv::new();

    env.exec_command_immediate_error_response(
        TestUtils::bgrewriteaof_command(),
        CommandError::AppendOnlyDisabled,
    )
    .await;
}
