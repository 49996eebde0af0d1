//! Tests for error types.

#[cfg(test)]
mod tests {
    use super::super::*;
    use std::path::Path;

    #[test]
    fn test_error_display() {
        let err = Error::config("root directory missing");
        assert_eq!(err.to_string(), "configuration error: root directory missing");
    }

    #[test]
    fn test_watcher_error_conversion() {
        let watch_err = WatcherError::WatchFailed {
            path: "/tmp/test".to_string(),
            reason: "permission denied".to_string(),
        };
        let err: Error = watch_err.into();
        assert!(matches!(err, Error::Watcher(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_watch_failed_helper() {
        let err = WatcherError::watch_failed(Path::new("/srv/data"), "No space left on device");
        assert_eq!(
            err.to_string(),
            "failed to watch path '/srv/data': No space left on device"
        );
    }

    #[test]
    fn test_walk_error_display() {
        let err = WatcherError::Walk {
            path: "/root/secret".to_string(),
            reason: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to walk path '/root/secret': permission denied"
        );
    }

    #[test]
    fn test_service_init_display() {
        let err = WatcherError::ServiceInit("inotify limit reached".to_string());
        assert_eq!(
            err.to_string(),
            "failed to initialize watch service: inotify limit reached"
        );
    }

    #[test]
    fn test_closed_display() {
        assert_eq!(WatcherError::Closed.to_string(), "watch service is closed");
    }

    #[test]
    fn test_nested_watcher_display() {
        let err: Error = WatcherError::Stream("queue overflow".to_string()).into();
        assert_eq!(
            err.to_string(),
            "watcher error: watch stream error: queue overflow"
        );
    }

    #[test]
    fn test_error_internal() {
        let err = Error::internal("collector task panicked");
        assert_eq!(err.to_string(), "internal error: collector task panicked");
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn inner() -> Result<i32> {
            Err(WatcherError::Closed.into())
        }

        fn outer() -> Result<i32> {
            let _ = inner()?;
            Ok(0)
        }

        let result = outer();
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "watcher error: watch service is closed"
        );
    }
}
