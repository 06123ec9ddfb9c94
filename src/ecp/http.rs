use std::collections::HashMap;
use std::io::{BufRead, Read, Result, Write};

pub const XML_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: String,
    pub target: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }
}

/// Read one HTTP/1.1 request from the stream: request line, headers, then
/// the body to completion per Content-Length. The body content is not used
/// by the modeled command set but must be consumed before responding.
pub fn read_request<R: BufRead>(reader: &mut R) -> Result<HttpRequest> {
    let mut line = String::with_capacity(128);
    if reader.read_line(&mut line)? == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed before request line",
        ));
    }

    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let target = parts.next().unwrap_or("").to_string();
    if method.is_empty() || target.is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("malformed request line: {:?}", line.trim_end()),
        ));
    }

    let mut headers = HashMap::new();
    loop {
        line.clear();
        let n = reader.read_line(&mut line)?;
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if n == 0 || trimmed.is_empty() {
            break;
        }
        if let Some((key, value)) = trimmed.split_once(':') {
            headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = vec![0u8; content_length];
    if content_length > 0 {
        reader.read_exact(&mut body)?;
    }

    Ok(HttpRequest {
        method,
        target,
        headers,
        body,
    })
}

/// Write a 200 response. Persistent connections are not supported: every
/// response carries `Connection: close` and the caller drops the transport.
pub fn write_ok<W: Write>(
    writer: &mut W,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<()> {
    writer.write_all(b"HTTP/1.1 200 OK\r\n")?;
    if let Some(content_type) = content_type {
        writer.write_all(format!("Content-Type: {}\r\n", content_type).as_bytes())?;
    }
    writer.write_all(format!("Content-Length: {}\r\n", body.len()).as_bytes())?;
    writer.write_all(b"Connection: close\r\n\r\n")?;
    writer.write_all(body)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    #[test]
    fn test_read_get_request() {
        let raw = b"GET /query/apps HTTP/1.1\r\nHost: 192.168.1.20:8060\r\n\r\n";
        let request = read_request(&mut BufReader::new(&raw[..])).unwrap();
        assert_eq!(request.method, "GET");
        assert_eq!(request.target, "/query/apps");
        assert_eq!(request.header("HOST"), Some("192.168.1.20:8060"));
        assert!(request.body.is_empty());
    }

    #[test]
    fn test_read_post_with_body() {
        let raw = b"POST /keypress/Home HTTP/1.1\r\nContent-Length: 4\r\n\r\nxyzw";
        let request = read_request(&mut BufReader::new(&raw[..])).unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.target, "/keypress/Home");
        assert_eq!(request.body, b"xyzw");
    }

    #[test]
    fn test_empty_connection_is_eof() {
        let err = read_request(&mut BufReader::new(&b""[..])).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_malformed_request_line_rejected() {
        let raw = b"garbage\r\n\r\n";
        let err = read_request(&mut BufReader::new(&raw[..])).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_response_always_closes() {
        let mut out = Vec::new();
        write_ok(&mut out, Some(XML_CONTENT_TYPE), b"<root/>").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Connection: close\r\n"));
        assert!(text.contains("Content-Type: text/xml; charset=utf-8\r\n"));
        assert!(text.contains("Content-Length: 7\r\n"));
        assert!(text.ends_with("\r\n\r\n<root/>"));
    }

    #[test]
    fn test_empty_response_has_no_content_type() {
        let mut out = Vec::new();
        write_ok(&mut out, None, b"").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("Content-Type"));
        assert!(text.contains("Content-Length: 0\r\n"));
    }
}
