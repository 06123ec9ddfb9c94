use std::collections::HashMap;

/// Tokenized HTTP-over-UDP datagram: a start line plus `Key: Value` header
/// lines. SSDP framing is line-oriented, so this parser is total over
/// arbitrary bytes; anything it cannot tokenize simply yields an empty or
/// partial message, never an error.
#[derive(Debug, Clone)]
pub struct SsdpMessage {
    pub start_line: String,
    headers: HashMap<String, String>,
}

impl SsdpMessage {
    pub fn parse(datagram: &[u8]) -> Self {
        let text = String::from_utf8_lossy(datagram);
        let mut lines = text.split("\r\n").flat_map(|chunk| chunk.split('\n'));

        let start_line = lines.next().unwrap_or("").trim_end().to_string();

        let mut headers = HashMap::new();
        for line in lines {
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((key, value)) = line.split_once(':') {
                // Header names are case-insensitive; values are kept verbatim
                // because SSDP's MAN token is matched case-sensitively.
                headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
            }
        }

        SsdpMessage {
            start_line,
            headers,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// True when the start line carries the M-SEARCH method token.
    pub fn is_search(&self) -> bool {
        self.start_line.contains("M-SEARCH")
    }

    /// True for search requests with the mandatory discovery extension,
    /// `MAN: "ssdp:discover"` (quoted literal, case-sensitive value).
    pub fn is_discover_probe(&self) -> bool {
        self.is_search() && self.header("man") == Some("\"ssdp:discover\"")
    }
}
