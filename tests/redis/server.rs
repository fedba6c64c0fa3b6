use std::path::PathBuf;

use tracing::Level;
use zedis::{
    aof::AppendFsync,
    server::{CliError, RedisServer},
};

#[test]
fn test_redis_server_creation_without_flags() {
    let args = vec!["zedis".to_string()];

    let server = RedisServer::new(args).unwrap();
    assert_eq!(server.port, 6379);
    assert_eq!(server.dir, PathBuf::from("."));
    assert!(!server.append_only);
    assert_eq!(server.append_filename, "appendonly.aof");
    assert_eq!(server.append_fsync, AppendFsync::Always);
    assert_eq!(server.log_level, Level::INFO);
    assert_eq!(server.shards, 16);
}

#[test]
fn test_redis_server_creation_with_flags() {
    let args = [
        "zedis",
        "--port",
        "6677",
        "--dir",
        "/tmp/zedis",
        "--appendonly",
        "yes",
        "--appendfilename",
        "log.aof",
        "--appendfsync",
        "no",
        "--loglevel",
        "debug",
        "--shards",
        "4",
    ]
    .into_iter()
    .map(String::from);

    let server = RedisServer::new(args).unwrap();
    assert_eq!(server.port, 6677);
    assert!(server.append_only);
    assert_eq!(server.append_fsync, AppendFsync::No);
    assert_eq!(server.log_level, Level::DEBUG);
    assert_eq!(server.shards, 4);
    assert_eq!(server.aof_path(), PathBuf::from("/tmp/zedis/log.aof"));
    assert_eq!(server.address(), "127.0.0.1:6677");
}

#[test]
fn test_redis_server_creation_with_invalid_flags() {
    let test_cases = vec![
        (vec!["--port", "invalid"], CliError::InvalidCommandLineFlagValue),
        (vec!["--port", "70000"], CliError::InvalidCommandLineFlagValue),
        (vec!["--port", "0"], CliError::InvalidCommandLineFlagValue),
        (vec!["--port"], CliError::InvalidCommandLineFlagValue),
        (vec!["--appendonly", "maybe"], CliError::InvalidCommandLineFlagValue),
        (vec!["--appendfsync", "everysec"], CliError::InvalidCommandLineFlagValue),
        (vec!["--appendfilename", "a/b.aof"], CliError::InvalidCommandLineFlagValue),
        (vec!["--loglevel", "loud"], CliError::InvalidCommandLineFlagValue),
        (vec!["--shards", "0"], CliError::InvalidCommandLineFlagValue),
        (vec!["invalid"], CliError::InvalidCommandLineFlag),
        (vec!["--replicaof", "localhost 6379"], CliError::InvalidCommandLineFlag),
    ];

    for (flags, expected_error) in test_cases {
        let args = std::iter::once("zedis")
            .chain(flags.iter().copied())
            .map(String::from);

        let result = RedisServer::new(args);
        assert_eq!(
            result.err(),
            Some(expected_error),
            "parsing flags {:?}",
            flags
        );
    }
}

#[test]
fn test_redis_server_creation_with_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("zedis.yaml");
    std::fs::write(
        &config_path,
        "port: 7000\n\
         dir: /var/lib/zedis\n\
         appendonly: true\n\
         appendfilename: data.aof\n\
         appendfsync: \"no\"\n\
         loglevel: warn\n\
         shards: 8\n",
    )
    .unwrap();

    // Flags win over the file wherever both set a value, before or after --config.
    let args = [
        "zedis",
        "--port",
        "7100",
        "--config",
        config_path.to_str().unwrap(),
        "--shards",
        "2",
    ]
    .into_iter()
    .map(String::from);

    let server = RedisServer::new(args).unwrap();
    assert_eq!(server.port, 7100);
    assert_eq!(server.shards, 2);
    assert!(server.append_only);
    assert_eq!(server.append_fsync, AppendFsync::No);
    assert_eq!(server.log_level, Level::WARN);
    assert_eq!(server.aof_path(), PathBuf::from("/var/lib/zedis/data.aof"));
}

#[test]
fn test_redis_server_creation_with_invalid_config_file() {
    let dir = tempfile::tempdir().unwrap();

    let test_cases = vec![
        ("invalid_yaml.yaml", Some("port: [7000\n")),
        ("unknown_field.yaml", Some("replicaof: localhost 6379\n")),
        ("wrong_type.yaml", Some("port: seven\n")),
        ("bad_value.yaml", Some("appendfsync: everysec\n")),
        ("zero_port.yaml", Some("port: 0\n")),
        ("missing.yaml", None),
    ];

    for (name, content) in test_cases {
        let path = dir.path().join(name);
        if let Some(content) = content {
            std::fs::write(&path, content).unwrap();
        }

        let args = ["zedis", "--config", path.to_str().unwrap()]
            .into_iter()
            .map(String::from);

        let result = RedisServer::new(args);
        assert!(
            matches!(result, Err(CliError::InvalidConfigFile(_))),
            "loading {}: {:?}",
            name,
            result
        );
    }

    let args = ["zedis", "--config"].into_iter().map(String::from);
    assert_eq!(
        RedisServer::new(args).err(),
        Some(CliError::InvalidCommandLineFlagValue)
    );
}
