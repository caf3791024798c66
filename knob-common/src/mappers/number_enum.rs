use std::collections::BTreeMap;

use compact_str::ToCompactString;

use crate::{ConfigError, MapError, Mapper};

/// Maps the numeric codes a device uses to named enum keys.
///
/// Both lookup tables are built once, up front. A code or key listed twice is rejected
/// at construction so that every code maps back to exactly one key.
///
/// ```
/// # use knob_common::{Mapper, mappers::EnumMapper};
/// let mode = EnumMapper::new([("heat", 1), ("cool", 2)]).unwrap();
///
/// assert_eq!(mode.to(2).unwrap(), "cool");
/// assert_eq!(mode.from("heat").unwrap(), 1);
/// assert!(mode.to(4).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct EnumMapper<C, K> {
    codes: BTreeMap<K, C>,
    keys: BTreeMap<C, K>,
}

impl<C, K> EnumMapper<C, K>
where
    C: Ord + Copy + ToCompactString,
    K: Ord + Clone + ToCompactString,
{
    pub fn new(entries: impl IntoIterator<Item = (K, C)>) -> Result<Self, ConfigError> {
        let mut codes = BTreeMap::new();
        let mut keys = BTreeMap::new();

        for (key, code) in entries {
            if keys.contains_key(&code) {
                return Err(ConfigError::DuplicateCode(code.to_compact_string()));
            }

            if codes.contains_key(&key) {
                return Err(ConfigError::DuplicateKey(key.to_compact_string()));
            }

            keys.insert(code, key.clone());
            codes.insert(key, code);
        }

        Ok(Self { codes, keys })
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.codes.keys()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl<C, K> Mapper<C, K> for EnumMapper<C, K>
where
    C: Ord + Copy + ToCompactString,
    K: Ord + Clone + ToCompactString,
{
    fn to(&self, input: C) -> Result<K, MapError> {
        self.keys
            .get(&input)
            .cloned()
            .ok_or_else(|| MapError::UnknownCode(input.to_compact_string()))
    }

    fn from(&self, output: K) -> Result<C, MapError> {
        self.codes
            .get(&output)
            .copied()
            .ok_or_else(|| MapError::UnknownKey(output.to_compact_string()))
    }
}
