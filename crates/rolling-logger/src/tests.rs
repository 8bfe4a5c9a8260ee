//! Rolling Logger Tests

#[cfg(test)]
mod tests {
    use crate::{LoggerConfig, LoggerError, RollingLogger};
    use std::fs;
    use std::io::Write;
    use tracing_subscriber::fmt::MakeWriter;

    fn memory_logger(buffer_lines: usize) -> RollingLogger {
        let config = LoggerConfig {
            buffer_lines,
            ..LoggerConfig::default()
        };
        RollingLogger::new(&config).expect("memory logger")
    }

    #[test]
    fn test_buffer_keeps_most_recent_lines() {
        let logger = memory_logger(3);
        let mut writer = logger.make_writer();

        for i in 1..=5 {
            writeln!(writer, "line {}", i).unwrap();
        }

        assert_eq!(logger.recent(), vec!["line 3", "line 4", "line 5"]);
    }

    #[test]
    fn test_partial_line_completed_by_next_write() {
        let logger = memory_logger(10);
        let mut writer = logger.make_writer();

        writer.write_all(b"hello ").unwrap();
        assert!(logger.recent().is_empty());

        writer.write_all(b"world\r\nnext").unwrap();
        assert_eq!(logger.recent(), vec!["hello world"]);
    }

    #[test]
    fn test_zero_capacity_buffer_keeps_nothing() {
        let logger = memory_logger(0);
        writeln!(logger.make_writer(), "dropped").unwrap();
        assert!(logger.recent().is_empty());
    }

    #[test]
    fn test_clear() {
        let logger = memory_logger(4);
        writeln!(logger.make_writer(), "a").unwrap();
        logger.clear();
        assert!(logger.recent().is_empty());
    }

    #[test]
    fn test_file_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggerConfig {
            dir: Some(dir.path().to_path_buf()),
            file_prefix: "app".to_string(),
            max_file_bytes: 32,
            max_files: 3,
            ..LoggerConfig::default()
        };
        let logger = RollingLogger::new(&config).unwrap();

        for i in 1..=4 {
            // 20 bytes per record, so every record after the first rotates
            let mut writer = logger.make_writer();
            writer.write_all(format!("record number {:05}\n", i).as_bytes()).unwrap();
            writer.flush().unwrap();
        }

        let read = |name: &str| fs::read_to_string(dir.path().join(name)).unwrap();
        assert_eq!(read("app.log"), "record number 00004\n");
        assert_eq!(read("app.log.1"), "record number 00003\n");
        assert_eq!(read("app.log.2"), "record number 00002\n");
        assert!(!dir.path().join("app.log.3").exists());
    }

    #[test]
    fn test_single_file_truncates_instead_of_archiving() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggerConfig {
            dir: Some(dir.path().to_path_buf()),
            file_prefix: "solo".to_string(),
            max_file_bytes: 10,
            max_files: 1,
            ..LoggerConfig::default()
        };
        let logger = RollingLogger::new(&config).unwrap();

        logger.make_writer().write_all(b"first one\n").unwrap();
        logger.make_writer().write_all(b"second\n").unwrap();

        let content = fs::read_to_string(dir.path().join("solo.log")).unwrap();
        assert_eq!(content, "second\n");
        assert!(!dir.path().join("solo.log.1").exists());
    }

    #[test]
    fn test_existing_file_size_counts_toward_rotation() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pre.log"), "0123456789\n").unwrap();
        let config = LoggerConfig {
            dir: Some(dir.path().to_path_buf()),
            file_prefix: "pre".to_string(),
            max_file_bytes: 12,
            max_files: 2,
            ..LoggerConfig::default()
        };
        let logger = RollingLogger::new(&config).unwrap();

        logger.make_writer().write_all(b"new\n").unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("pre.log.1")).unwrap(), "0123456789\n");
        assert_eq!(fs::read_to_string(dir.path().join("pre.log")).unwrap(), "new\n");
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: LoggerConfig = serde_json::from_str(r#"{ "level": "debug" }"#).unwrap();
        assert_eq!(config.level, "debug");
        assert_eq!(config.max_files, LoggerConfig::default().max_files);
        assert!(config.dir.is_none());
    }

    #[test]
    fn test_invalid_level_rejected_before_install() {
        let config = LoggerConfig {
            level: "loud".to_string(),
            ..LoggerConfig::default()
        };
        match RollingLogger::init(&config) {
            Err(LoggerError::InvalidLevel(level)) => assert_eq!(level, "loud"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected invalid level"),
        }
    }
}
