//! Replay Module
//!
//! Drives a cache from a line-oriented command script, one result line per
//! command. Used by the `byte_lru` binary to exercise a cache against a
//! recorded workload.
//!
//! # Script Format
//! ```text
//! # comment
//! put   <key> <value...>
//! putnx <key> <value...>
//! set   <key> <value...>
//! get   <key>
//! del   <key>
//! len
//! stats
//! ```
//! The value is the rest of the line after the key and may contain spaces or
//! be empty.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::BoundedLruCache;
use crate::storage::Storage;

// == Replay Error ==
/// Errors raised while reading or writing a replay script.
#[derive(Error, Debug)]
pub enum ReplayError {
    /// Malformed script line
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Reading the script or writing results failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Stats could not be encoded
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

// == Command ==
/// A single parsed script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Put { key: String, value: String },
    PutIfAbsent { key: String, value: String },
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
    Len,
    Stats,
}

/// Parses one script line. Blank lines and `#` comments yield `None`.
///
/// `line_no` is only used for error messages.
pub fn parse_command(line: &str, line_no: usize) -> Result<Option<Command>, ReplayError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let parse_err = |message: &str| ReplayError::Parse {
        line: line_no,
        message: message.to_string(),
    };

    let (word, rest) = split_word(trimmed);
    let verb = word.to_ascii_lowercase();
    let command = match verb.as_str() {
        "put" | "putnx" | "set" => {
            let (key, value) = split_word(rest);
            if key.is_empty() {
                return Err(parse_err("missing key"));
            }
            let (key, value) = (key.to_string(), value.to_string());
            match verb.as_str() {
                "put" => Command::Put { key, value },
                "putnx" => Command::PutIfAbsent { key, value },
                _ => Command::Set { key, value },
            }
        }
        "get" | "del" => {
            let (key, extra) = split_word(rest);
            if key.is_empty() {
                return Err(parse_err("missing key"));
            }
            if !extra.trim().is_empty() {
                return Err(parse_err("unexpected trailing arguments"));
            }
            let key = key.to_string();
            if verb == "get" {
                Command::Get { key }
            } else {
                Command::Delete { key }
            }
        }
        "len" | "stats" => {
            if !rest.trim().is_empty() {
                return Err(parse_err("unexpected trailing arguments"));
            }
            if verb == "len" {
                Command::Len
            } else {
                Command::Stats
            }
        }
        other => return Err(parse_err(&format!("unknown command '{other}'"))),
    };
    Ok(Some(command))
}

/// Splits off the first whitespace-delimited word. The remainder keeps
/// everything after the single separating whitespace character.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.char_indices().find(|(_, c)| c.is_whitespace()) {
        Some((idx, c)) => (&s[..idx], &s[idx + c.len_utf8()..]),
        None => (s, ""),
    }
}

fn ok() -> String {
    "OK".to_string()
}

// == Replay Summary ==
/// Counters for a finished replay run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Commands executed
    pub commands: usize,
    /// Commands the cache rejected
    pub failures: usize,
    /// Lines that could not be parsed
    pub parse_errors: usize,
}

// == Replayer ==
/// Applies script commands to an owned cache.
#[derive(Debug)]
pub struct Replayer {
    cache: BoundedLruCache,
}

impl Replayer {
    pub fn new(cache: BoundedLruCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &BoundedLruCache {
        &self.cache
    }

    pub fn into_cache(self) -> BoundedLruCache {
        self.cache
    }

    // == Execute ==
    /// Runs one command and returns its result line (without newline).
    pub fn execute(&mut self, command: Command) -> Result<String, ReplayError> {
        let cache = &mut self.cache;
        let outcome = match command {
            Command::Put { key, value } => Storage::put(cache, key, value).map(|_| ok()),
            Command::PutIfAbsent { key, value } => {
                Storage::put_if_absent(cache, key, value).map(|_| ok())
            }
            Command::Set { key, value } => Storage::set(cache, &key, value).map(|_| ok()),
            Command::Get { key } => Storage::get(cache, &key).map(|value| format!("VALUE {value}")),
            Command::Delete { key } => Storage::delete(cache, &key).map(|_| ok()),
            Command::Len => Ok(format!("LEN {}", Storage::len(cache))),
            Command::Stats => Ok(format!("STATS {}", serde_json::to_string(&cache.stats())?)),
        };
        Ok(outcome.unwrap_or_else(|err| format!("ERR {err}")))
    }

    // == Run ==
    /// Replays every line from `reader`, writing one result line per command
    /// to `writer`. Malformed lines are reported inline and skipped.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        reader: R,
        mut writer: W,
    ) -> Result<ReplaySummary, ReplayError> {
        let mut summary = ReplaySummary::default();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let command = match parse_command(&line, idx + 1) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    warn!("Skipping script line: {}", err);
                    summary.parse_errors += 1;
                    writeln!(writer, "ERR {err}")?;
                    continue;
                }
            };

            debug!(?command, "replaying");
            let result = self.execute(command)?;
            if result.starts_with("ERR ") {
                summary.failures += 1;
            }
            summary.commands += 1;
            writeln!(writer, "{result}")?;
        }

        writer.flush()?;
        Ok(summary)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Option<Command> {
        parse_command(line, 1).unwrap()
    }

    #[test]
    fn test_parse_put_with_spaces_in_value() {
        assert_eq!(
            parse("put greeting hello world"),
            Some(Command::Put {
                key: "greeting".to_string(),
                value: "hello world".to_string()
            })
        );
    }

    #[test]
    fn test_parse_empty_value() {
        assert_eq!(
            parse("set k"),
            Some(Command::Set {
                key: "k".to_string(),
                value: String::new()
            })
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse("PUTNX k v"),
            Some(Command::PutIfAbsent {
                key: "k".to_string(),
                value: "v".to_string()
            })
        );
        assert_eq!(parse("get k"), Some(Command::Get { key: "k".to_string() }));
        assert_eq!(parse("del k"), Some(Command::Delete { key: "k".to_string() }));
        assert_eq!(parse("len"), Some(Command::Len));
        assert_eq!(parse("stats\r\n"), Some(Command::Stats));
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("# put k v"), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_command("fetch k", 3),
            Err(ReplayError::Parse { line: 3, .. })
        ));
        assert!(parse_command("put", 1).is_err());
        assert!(parse_command("get", 1).is_err());
        assert!(parse_command("get a b", 1).is_err());
        assert!(parse_command("len 2", 1).is_err());
    }

    #[test]
    fn test_execute() {
        let mut replayer = Replayer::new(BoundedLruCache::new(10).unwrap());

        let put = Command::Put {
            key: "a".to_string(),
            value: "1".to_string(),
        };
        assert_eq!(replayer.execute(put).unwrap(), "OK");
        assert_eq!(
            replayer
                .execute(Command::Get { key: "a".to_string() })
                .unwrap(),
            "VALUE 1"
        );
        assert_eq!(
            replayer
                .execute(Command::Delete { key: "zz".to_string() })
                .unwrap(),
            "ERR Key not found: zz"
        );
        assert_eq!(replayer.execute(Command::Len).unwrap(), "LEN 1");

        let stats = replayer.execute(Command::Stats).unwrap();
        assert!(stats.starts_with("STATS {"));
        assert!(stats.contains("\"hits\":1"));
    }

    #[test]
    fn test_run_script() {
        let script = "\
# capacity 10
put a 1
put bb 22
put ccc 333
get a
bogus
len
";
        let mut replayer = Replayer::new(BoundedLruCache::new(10).unwrap());
        let mut out = Vec::new();
        let summary = replayer.run(script.as_bytes(), &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "OK",
                "OK",
                "OK",
                "ERR Key not found: a",
                "ERR line 6: unknown command 'bogus'",
                "LEN 2",
            ]
        );
        assert_eq!(
            summary,
            ReplaySummary {
                commands: 5,
                failures: 1,
                parse_errors: 1
            }
        );
        assert_eq!(replayer.cache().current_bytes(), 10);
    }
}
