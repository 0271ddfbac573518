use std::collections::BTreeMap;
use std::fmt::Write;
use std::io::BufRead;
use std::path::Path;

use crate::error::{Result, TransferError};
use crate::input::reader::{for_each_data_line, open_maybe_gz};
use crate::model::profile::{Profile, ProfileColumn};

/// Read-only set of characterized factors and their binding profiles.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCollection {
    profiles: BTreeMap<String, Profile>,
}

impl ReferenceCollection {
    pub fn from_profiles(entries: impl IntoIterator<Item = (String, Profile)>) -> Self {
        Self {
            profiles: entries.into_iter().collect(),
        }
    }

    pub fn lookup(&self, name: &str) -> Result<&Profile> {
        self.profiles.get(name).ok_or_else(|| {
            TransferError::Lookup(format!("'{}' is not in the reference collection", name))
        })
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

pub fn load_collection(path: &Path) -> Result<ReferenceCollection> {
    let reader = open_maybe_gz(path)?;
    let collection = parse_collection(reader)?;
    if collection.is_empty() {
        tracing::warn!("reference collection {} has no profiles", path.display());
    }
    tracing::info!(
        "loaded {} reference profiles from {}",
        collection.len(),
        path.display()
    );
    Ok(collection)
}

/// Blocks of `ID <name>`, `MA <A> <C> <G> <T>` rows and a closing `//`.
pub fn parse_collection<R: BufRead>(reader: R) -> Result<ReferenceCollection> {
    let mut profiles = BTreeMap::new();
    let mut current: Option<(String, Vec<ProfileColumn>)> = None;

    for_each_data_line(reader, |line_no, line| {
        let (tag, rest) = split_tag(line);
        match tag {
            "ID" => {
                if let Some((name, _)) = &current {
                    return Err(TransferError::Parse(format!(
                        "collection line {}: block '{}' is not closed with //",
                        line_no, name
                    )));
                }
                if rest.is_empty() {
                    return Err(TransferError::Parse(format!(
                        "collection line {}: ID without a name",
                        line_no
                    )));
                }
                current = Some((rest.to_string(), Vec::new()));
            }
            "MA" => {
                let Some((_, columns)) = current.as_mut() else {
                    return Err(TransferError::Parse(format!(
                        "collection line {}: MA row outside an ID block",
                        line_no
                    )));
                };
                columns.push(parse_ma_values(line_no, rest)?);
            }
            "//" => {
                let Some((name, columns)) = current.take() else {
                    return Err(TransferError::Parse(format!(
                        "collection line {}: // without an open block",
                        line_no
                    )));
                };
                if columns.is_empty() {
                    return Err(TransferError::Parse(format!(
                        "collection line {}: profile '{}' has no columns",
                        line_no, name
                    )));
                }
                if profiles.contains_key(&name) {
                    return Err(TransferError::Parse(format!(
                        "collection line {}: duplicate profile '{}'",
                        line_no, name
                    )));
                }
                profiles.insert(name, Profile::new(columns));
            }
            // XX separators and free-text tags carry nothing we need.
            _ => {}
        }
        Ok(())
    })?;

    if let Some((name, _)) = current {
        return Err(TransferError::Parse(format!(
            "collection ends inside block '{}'",
            name
        )));
    }

    Ok(ReferenceCollection::from_profiles(profiles))
}

/// Parses the `MA` rows of a single profile, e.g. the stdout of a blending tool.
pub fn parse_profile_rows(text: &str) -> Result<Profile> {
    let mut columns = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        let (tag, rest) = split_tag(line);
        if tag == "MA" {
            columns.push(parse_ma_values(idx + 1, rest)?);
        }
    }
    if columns.is_empty() {
        return Err(TransferError::Parse("no MA rows found".to_string()));
    }
    Ok(Profile::new(columns))
}

pub fn write_profile_block(out: &mut String, name: &str, profile: &Profile) {
    let _ = writeln!(out, "ID  {}", name);
    for col in profile.columns() {
        let _ = writeln!(
            out,
            "MA  {:.6}  {:.6}  {:.6}  {:.6}",
            col.a, col.c, col.g, col.t
        );
    }
    out.push_str("//\n");
}

fn split_tag(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((tag, rest)) => (tag, rest.trim()),
        None => (line, ""),
    }
}

fn parse_ma_values(line_no: usize, rest: &str) -> Result<ProfileColumn> {
    let cols: Vec<&str> = rest.split_whitespace().collect();
    if cols.len() != 4 {
        return Err(TransferError::Parse(format!(
            "line {}: MA row has {} values, expected 4",
            line_no,
            cols.len()
        )));
    }
    let mut values = [0.0f64; 4];
    for (slot, raw) in values.iter_mut().zip(&cols) {
        *slot = raw.parse().map_err(|_| {
            TransferError::Parse(format!("line {}: invalid MA value '{}'", line_no, raw))
        })?;
    }
    ProfileColumn::from_counts(values).ok_or_else(|| {
        TransferError::Parse(format!(
            "line {}: MA row must be non-negative with a positive total",
            line_no
        ))
    })
}
