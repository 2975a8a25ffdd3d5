//! Grouped key-value files, as used by the chip description sources.
//!
//! The format is a plain INI dialect: `[GROUP]` headers, `KEY=VALUE` lines,
//! `#`- or `;`-prefixed comment lines.  A value may carry one trailing `;`,
//! which is stripped.  Integer lists are comma-separated.

use indexmap::IndexMap;
use simple_error::{SimpleError, bail};
use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct KeyFile {
    groups: IndexMap<String, IndexMap<String, String>>,
}

impl KeyFile {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let f = File::open(path.as_ref())?;
        Self::from_read(BufReader::new(f))
    }

    pub fn from_read(r: impl BufRead) -> Result<Self, Box<dyn Error>> {
        let mut groups: IndexMap<String, IndexMap<String, String>> = IndexMap::new();
        for (lno, line) in r.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[') {
                let Some(name) = name.strip_suffix(']') else {
                    bail!("line {lno}: unterminated group header {line}", lno = lno + 1);
                };
                if groups.insert(name.to_string(), IndexMap::new()).is_some() {
                    bail!("line {lno}: duplicate group {name}", lno = lno + 1);
                }
            } else if let Some((key, val)) = line.split_once('=') {
                let Some((_, group)) = groups.last_mut() else {
                    bail!("line {lno}: key outside of any group", lno = lno + 1);
                };
                let key = key.trim();
                let val = val.trim();
                let val = val.strip_suffix(';').unwrap_or(val).trim_end();
                if group.insert(key.to_string(), val.to_string()).is_some() {
                    bail!("line {lno}: duplicate key {key}", lno = lno + 1);
                }
            } else {
                bail!("line {lno}: malformed line {line}", lno = lno + 1);
            }
        }
        Ok(KeyFile { groups })
    }

    /// Group names, in file order.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    pub fn get(&self, group: &str, key: &str) -> Result<&str, SimpleError> {
        let Some(g) = self.groups.get(group) else {
            return Err(SimpleError::new(format!("missing group {group}")));
        };
        match g.get(key) {
            Some(v) => Ok(v),
            None => Err(SimpleError::new(format!(
                "group {group}: missing key {key}"
            ))),
        }
    }

    pub fn get_int(&self, group: &str, key: &str) -> Result<i32, SimpleError> {
        let v = self.get(group, key)?;
        v.parse().map_err(|_| {
            SimpleError::new(format!("group {group}: key {key}: not an integer: {v}"))
        })
    }

    /// Comma-separated integer list; an empty value is an empty list.
    pub fn get_int_list(&self, group: &str, key: &str) -> Result<Vec<i32>, SimpleError> {
        let v = self.get(group, key)?;
        if v.is_empty() {
            return Ok(vec![]);
        }
        v.split(',')
            .map(|field| {
                field.trim().parse().map_err(|_| {
                    SimpleError::new(format!(
                        "group {group}: key {key}: not an integer list: {v}"
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> KeyFile {
        KeyFile::from_read(text.as_bytes()).unwrap()
    }

    #[test]
    fn basic() {
        let kf = parse("[A]\nX=1;\nY = 2\n[B]\nLIST=3,4, 5;\n");
        assert_eq!(kf.groups().collect::<Vec<_>>(), ["A", "B"]);
        assert!(kf.has_group("A"));
        assert!(!kf.has_group("C"));
        assert_eq!(kf.get("A", "X").unwrap(), "1");
        assert_eq!(kf.get_int("A", "X").unwrap(), 1);
        assert_eq!(kf.get_int("A", "Y").unwrap(), 2);
        assert_eq!(kf.get_int_list("B", "LIST").unwrap(), [3, 4, 5]);
    }

    #[test]
    fn comments_and_blanks() {
        let kf = parse("# header\n\n[A]\n; note\nX=1;\n");
        assert_eq!(kf.get_int("A", "X").unwrap(), 1);
        assert_eq!(kf.groups().count(), 1);
    }

    #[test]
    fn empty_value() {
        let kf = parse("[A]\nX=;\n");
        assert_eq!(kf.get("A", "X").unwrap(), "");
        assert!(kf.get_int_list("A", "X").unwrap().is_empty());
        assert!(kf.get_int("A", "X").is_err());
    }

    #[test]
    fn negative_ints() {
        let kf = parse("[A]\nX=-3;\nL=-1,4;\n");
        assert_eq!(kf.get_int("A", "X").unwrap(), -3);
        assert_eq!(kf.get_int_list("A", "L").unwrap(), [-1, 4]);
    }

    #[test]
    fn missing_group_and_key() {
        let kf = parse("[A]\nX=1;\n");
        let e = kf.get_int("B", "X").unwrap_err();
        assert!(e.to_string().contains("missing group B"));
        let e = kf.get_int("A", "Z").unwrap_err();
        assert!(e.to_string().contains("missing key Z"));
    }

    #[test]
    fn bad_int() {
        let kf = parse("[A]\nX=meow;\nL=1,meow;\n");
        assert!(kf.get_int("A", "X").is_err());
        assert!(kf.get_int_list("A", "L").is_err());
    }

    #[test]
    fn parse_errors() {
        assert!(KeyFile::from_read(&b"[A\nX=1;\n"[..]).is_err());
        assert!(KeyFile::from_read(&b"X=1;\n"[..]).is_err());
        assert!(KeyFile::from_read(&b"[A]\nwhatever\n"[..]).is_err());
        assert!(KeyFile::from_read(&b"[A]\nX=1;\nX=2;\n"[..]).is_err());
        assert!(KeyFile::from_read(&b"[A]\n[A]\n"[..]).is_err());
    }

    #[test]
    fn missing_file() {
        assert!(KeyFile::from_file("/nonexistent/keyfile").is_err());
    }
}
