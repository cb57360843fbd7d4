use std::net::SocketAddr;
use std::sync::Arc;
use std::thread;

use lantern::http::response::StatusCode;
use lantern::server::access_log::{AccessLog, LogRecord};

#[test]
fn test_access_log_line_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.log");
    let log = AccessLog::open(&path).unwrap();
    let remote: SocketAddr = "192.168.1.7:51234".parse().unwrap();

    log.record(&LogRecord::new(remote, "GET /index.html HTTP/1.1", StatusCode::Ok))
        .unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let line = text.strip_suffix('\n').unwrap();
    let fields: Vec<&str> = line.split(" - ").collect();

    assert_eq!(fields.len(), 4, "{line}");
    // 2024-05-01 12:00:00
    assert_eq!(fields[0].len(), 19);
    assert!(chrono::NaiveDateTime::parse_from_str(fields[0], "%Y-%m-%d %H:%M:%S").is_ok());
    assert_eq!(fields[1], "192.168.1.7:51234");
    assert_eq!(fields[2], "\"GET /index.html HTTP/1.1\"");
    assert_eq!(fields[3], "200 OK");
}

#[test]
fn test_access_log_appends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs/server.log");
    let remote: SocketAddr = "127.0.0.1:1".parse().unwrap();

    {
        let log = AccessLog::open(&path).unwrap();
        log.record(&LogRecord::new(remote, "GET /a.html HTTP/1.1", StatusCode::NotFound))
            .unwrap();
    }
    {
        let log = AccessLog::open(&path).unwrap();
        log.record(&LogRecord::new(remote, "", StatusCode::BadRequest))
            .unwrap();
    }

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("\"GET /a.html HTTP/1.1\" - 404 Not Found"));
    assert!(lines[1].ends_with("\"<invalid request>\" - 400 Bad Request"));
}

#[test]
fn test_access_log_concurrent_writers_do_not_interleave() {
    const THREADS: usize = 16;
    const PER_THREAD: usize = 200;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.log");
    let log = Arc::new(AccessLog::open(&path).unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let log = Arc::clone(&log);
            thread::spawn(move || {
                let remote: SocketAddr = format!("10.0.0.{}:{}", t + 1, 40000 + t).parse().unwrap();
                for i in 0..PER_THREAD {
                    let line = format!("GET /file-{t}-{i}.html HTTP/1.1");
                    log.record(&LogRecord::new(remote, &line, StatusCode::Ok)).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), THREADS * PER_THREAD);
    for line in lines {
        let fields: Vec<&str> = line.split(" - ").collect();
        assert_eq!(fields.len(), 4, "corrupted line: {line}");
        assert!(fields[2].starts_with("\"GET /file-") && fields[2].ends_with(" HTTP/1.1\""));
        assert_eq!(fields[3], "200 OK");
    }
}

#[test]
fn test_access_log_handles_on_one_file_keep_record_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.log");
    let first = AccessLog::open(&path).unwrap();
    let second = AccessLog::open(&path).unwrap();
    let remote: SocketAddr = "127.0.0.1:9".parse().unwrap();

    for i in 0..3 {
        first
            .record(&LogRecord::new(remote, &format!("GET /a{i}.html HTTP/1.1"), StatusCode::Ok))
            .unwrap();
        second
            .record(&LogRecord::new(remote, &format!("GET /b{i}.html HTTP/1.1"), StatusCode::NotFound))
            .unwrap();
    }

    let text = std::fs::read_to_string(&path).unwrap();
    let targets: Vec<&str> = text
        .lines()
        .map(|line| line.split(' ').nth(6).unwrap())
        .collect();

    assert_eq!(targets, ["/a0.html", "/b0.html", "/a1.html", "/b1.html", "/a2.html", "/b2.html"]);
}
