//! Builder policy knobs and the attribute translator.

use std::collections::HashMap;
use std::sync::Arc;

use crate::encoding::magic;
use crate::error::{VPackError, VPackResult};

/// Per-builder options influencing layout decisions.
///
/// Plain data; clone freely. The defaults match the common interchange
/// profile: sorted object indexes, indexed layouts, externals allowed.
#[derive(Debug, Clone)]
pub struct Options {
    /// Build new objects with a sorted offset index (heads `0x0b..0x0e`).
    pub sort_attribute_names: bool,
    /// Prefer the compact array layout even without a per-call flag.
    pub build_unindexed_arrays: bool,
    /// Prefer the compact object layout even without a per-call flag.
    pub build_unindexed_objects: bool,
    /// Refuse `External` values.
    pub disallow_externals: bool,
    /// Re-check attribute uniqueness when an object closes.
    pub check_attribute_uniqueness: bool,
    /// Whether an external parser feeding a builder resets it first. Carried
    /// here because the option set is shared with those collaborators; the
    /// core itself never reads it.
    pub clear_builder_before_parse: bool,
    /// Maximum compound nesting depth.
    pub max_depth: usize,
    /// Optional sealed key translation table.
    pub attribute_translator: Option<Arc<AttributeTranslator>>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sort_attribute_names: true,
            build_unindexed_arrays: false,
            build_unindexed_objects: false,
            disallow_externals: false,
            check_attribute_uniqueness: false,
            clear_builder_before_parse: true,
            max_depth: 512,
            attribute_translator: None,
        }
    }
}

/// Bijection between frequently-used attribute names and small integer ids,
/// allowing one-byte key encodings.
///
/// Fill with [`add`](Self::add), then [`seal`](Self::seal) before handing it
/// to [`Options`]; both lookup directions refuse to work unsealed, and a
/// sealed translator refuses further additions.
#[derive(Debug, Default)]
pub struct AttributeTranslator {
    by_name: HashMap<String, u8>,
    // Encoded key value per id (index = id), ready to splice into a document.
    by_id: Vec<Option<Vec<u8>>>,
    sealed: bool,
}

impl AttributeTranslator {
    /// Create an empty, unsealed translator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` under `id` (1..=255). Ids up to 9 encode as one-byte
    /// inline integers, larger ids as one-byte unsigned integers.
    pub fn add(&mut self, name: &str, id: u8) -> VPackResult<()> {
        if self.sealed {
            return Err(VPackError::InternalError(
                "attribute translator is already sealed",
            ));
        }
        if id == 0 {
            return Err(VPackError::InternalError(
                "attribute id 0 is reserved",
            ));
        }
        if self.by_name.contains_key(name) {
            return Err(VPackError::InternalError(
                "attribute name registered twice",
            ));
        }
        if self.by_id.len() <= id as usize {
            self.by_id.resize(id as usize + 1, None);
        }
        if self.by_id[id as usize].is_some() {
            return Err(VPackError::InternalError("attribute id registered twice"));
        }
        self.by_name.insert(name.to_owned(), id);
        self.by_id[id as usize] = Some(encode_key_string(name));
        Ok(())
    }

    /// Freeze the table. Required before first use.
    pub fn seal(&mut self) {
        log::debug!("sealing attribute translator with {} entries", self.by_name.len());
        self.sealed = true;
    }

    /// Whether the table has been sealed.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Number of registered attributes.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether no attributes are registered.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Id for `name`, if registered.
    pub fn translate(&self, name: &str) -> VPackResult<Option<u8>> {
        self.check_sealed()?;
        Ok(self.by_name.get(name).copied())
    }

    /// Original name for `id`, if registered.
    pub fn name_of(&self, id: u64) -> VPackResult<Option<&str>> {
        Ok(self.encoded_key(id)?.map(|bytes| {
            // Skip the string head; the stored bytes were produced from &str.
            let start = if bytes[0] == magic::STRING_LONG { 9 } else { 1 };
            std::str::from_utf8(&bytes[start..]).expect("translator stores UTF-8")
        }))
    }

    /// Encoded string value for `id`, if registered. The returned bytes form
    /// a complete value and can back a slice.
    pub fn encoded_key(&self, id: u64) -> VPackResult<Option<&[u8]>> {
        self.check_sealed()?;
        if id == 0 || id >= self.by_id.len() as u64 {
            return Ok(None);
        }
        Ok(self.by_id[id as usize].as_deref())
    }

    fn check_sealed(&self) -> VPackResult<()> {
        if !self.sealed {
            return Err(VPackError::InternalError(
                "attribute translator must be sealed before use",
            ));
        }
        Ok(())
    }
}

/// Encode `name` as a standalone string value (short or long form).
fn encode_key_string(name: &str) -> Vec<u8> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(1 + bytes.len());
    if bytes.len() <= magic::STRING_SHORT_MAX_LEN {
        out.push(magic::STRING_SHORT_BASE + bytes.len() as u8);
    } else {
        out.push(magic::STRING_LONG);
        out.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
    }
    out.extend_from_slice(bytes);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_both_directions() {
        let mut t = AttributeTranslator::new();
        t.add("foo", 1).unwrap();
        t.add("quetzalcoatl", 6).unwrap();
        t.seal();

        assert_eq!(t.translate("foo").unwrap(), Some(1));
        assert_eq!(t.translate("bar").unwrap(), None);
        assert_eq!(t.name_of(6).unwrap(), Some("quetzalcoatl"));
        assert_eq!(t.name_of(2).unwrap(), None);
        assert_eq!(t.name_of(0).unwrap(), None);
    }

    #[test]
    fn unsealed_lookups_fail() {
        let mut t = AttributeTranslator::new();
        t.add("foo", 1).unwrap();
        assert!(t.translate("foo").is_err());
        assert!(t.name_of(1).is_err());
    }

    #[test]
    fn sealed_rejects_additions() {
        let mut t = AttributeTranslator::new();
        t.seal();
        assert!(t.add("foo", 1).is_err());
    }

    #[test]
    fn duplicate_registrations_fail() {
        let mut t = AttributeTranslator::new();
        t.add("foo", 1).unwrap();
        assert!(t.add("foo", 2).is_err());
        assert!(t.add("bar", 1).is_err());
        assert!(t.add("baz", 0).is_err());
    }

    #[test]
    fn encoded_key_is_a_short_string() {
        let mut t = AttributeTranslator::new();
        t.add("bark", 4).unwrap();
        t.seal();
        let bytes = t.encoded_key(4).unwrap().unwrap();
        assert_eq!(bytes, [0x44, b'b', b'a', b'r', b'k']);
    }
}
