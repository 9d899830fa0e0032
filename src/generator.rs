//! Random password generation from a validated character-class policy.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::error::PassforgeError;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()-_=+[]{}|;:,.<>?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Lowercase,
    Uppercase,
    Digits,
    Symbols,
}

impl CharClass {
    pub const ALL: [CharClass; 4] = [
        CharClass::Lowercase,
        CharClass::Uppercase,
        CharClass::Digits,
        CharClass::Symbols,
    ];

    pub fn charset(self) -> &'static [u8] {
        match self {
            CharClass::Lowercase => LOWERCASE,
            CharClass::Uppercase => UPPERCASE,
            CharClass::Digits => DIGITS,
            CharClass::Symbols => SYMBOLS,
        }
    }

    pub fn contains(self, c: char) -> bool {
        c.is_ascii() && self.charset().contains(&(c as u8))
    }
}

/// Accepted password length range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub min: usize,
    pub max: usize,
}

impl Default for LengthBounds {
    fn default() -> Self {
        Self { min: 1, max: 128 }
    }
}

/// Raw generation parameters as they arrive from a JSON body or an HTML form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyInput {
    #[serde(deserialize_with = "de_length")]
    pub length: Option<i64>,
    #[serde(deserialize_with = "de_flag")]
    pub lowercase: bool,
    #[serde(deserialize_with = "de_flag")]
    pub uppercase: bool,
    #[serde(deserialize_with = "de_flag")]
    pub digits: bool,
    #[serde(deserialize_with = "de_flag")]
    pub symbols: bool,
    #[serde(deserialize_with = "de_flag")]
    pub require_each_class: bool,
}

/// A policy that has passed validation. `generate` only accepts this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationPolicy {
    length: usize,
    lowercase: bool,
    uppercase: bool,
    digits: bool,
    symbols: bool,
    #[serde(default)]
    require_each_class: bool,
}

impl GenerationPolicy {
    /// Start a policy with no classes selected. Call `check` before use.
    pub fn new(length: usize) -> Self {
        Self {
            length,
            lowercase: false,
            uppercase: false,
            digits: false,
            symbols: false,
            require_each_class: false,
        }
    }

    pub fn with_lowercase(mut self) -> Self {
        self.lowercase = true;
        self
    }

    pub fn with_uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    pub fn with_digits(mut self) -> Self {
        self.digits = true;
        self
    }

    pub fn with_symbols(mut self) -> Self {
        self.symbols = true;
        self
    }

    pub fn with_each_class_required(mut self) -> Self {
        self.require_each_class = true;
        self
    }

    pub fn validate(
        input: &PolicyInput,
        default_length: usize,
        bounds: LengthBounds,
    ) -> Result<Self, PassforgeError> {
        let length = match input.length {
            None => default_length,
            Some(n) if n <= 0 => {
                return Err(PassforgeError::invalid(
                    "password length must be a positive integer",
                ));
            }
            Some(n) => usize::try_from(n)
                .map_err(|_| PassforgeError::invalid("password length is too large"))?,
        };
        Self {
            length,
            lowercase: input.lowercase,
            uppercase: input.uppercase,
            digits: input.digits,
            symbols: input.symbols,
            require_each_class: input.require_each_class,
        }
        .check(bounds)
    }

    pub fn check(self, bounds: LengthBounds) -> Result<Self, PassforgeError> {
        if self.length == 0 {
            return Err(PassforgeError::invalid(
                "password length must be a positive integer",
            ));
        }
        if self.length < bounds.min || self.length > bounds.max {
            return Err(PassforgeError::invalid(format!(
                "password length must be between {} and {}",
                bounds.min, bounds.max
            )));
        }
        let selected = self.classes().count();
        if selected == 0 {
            return Err(PassforgeError::invalid(
                "at least one character class must be selected",
            ));
        }
        if self.require_each_class && self.length < selected {
            return Err(PassforgeError::invalid(format!(
                "password length {} is too short to include all {} selected character classes",
                self.length, selected
            )));
        }
        Ok(self)
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn require_each_class(&self) -> bool {
        self.require_each_class
    }

    pub fn includes(&self, class: CharClass) -> bool {
        match class {
            CharClass::Lowercase => self.lowercase,
            CharClass::Uppercase => self.uppercase,
            CharClass::Digits => self.digits,
            CharClass::Symbols => self.symbols,
        }
    }

    pub fn classes(&self) -> impl Iterator<Item = CharClass> + '_ {
        CharClass::ALL.into_iter().filter(move |c| self.includes(*c))
    }

    fn alphabet(&self) -> Vec<u8> {
        self.classes()
            .flat_map(|c| c.charset().iter().copied())
            .collect()
    }
}

impl fmt::Display for GenerationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .classes()
            .map(|c| match c {
                CharClass::Lowercase => "lowercase",
                CharClass::Uppercase => "uppercase",
                CharClass::Digits => "digits",
                CharClass::Symbols => "symbols",
            })
            .collect();
        write!(f, "{} chars, {}", self.length, names.join("+"))?;
        if self.require_each_class {
            f.write_str(", each class required")?;
        }
        Ok(())
    }
}

/// Generate a password from the thread-local CSPRNG.
///
/// Every character is drawn uniformly from the union of the selected
/// classes. With `require_each_class` one character of each class is
/// seeded first and the whole buffer is shuffled afterwards.
pub fn generate(policy: &GenerationPolicy) -> Result<String, PassforgeError> {
    let alphabet = policy.alphabet();
    if alphabet.is_empty() || policy.length == 0 {
        return Err(PassforgeError::invalid(
            "at least one character class must be selected",
        ));
    }

    let mut rng = rand::rng();
    let mut buf: Vec<u8> = Vec::with_capacity(policy.length);

    if policy.require_each_class {
        for class in policy.classes() {
            let set = class.charset();
            buf.push(set[rng.random_range(0..set.len())]);
        }
    }
    while buf.len() < policy.length {
        buf.push(alphabet[rng.random_range(0..alphabet.len())]);
    }
    if policy.require_each_class {
        buf.shuffle(&mut rng);
    }

    Ok(buf.into_iter().map(char::from).collect())
}

fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct FlagVisitor;

    impl de::Visitor<'_> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a boolean or a checkbox value")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            match v.trim().to_ascii_lowercase().as_str() {
                "on" | "true" | "1" | "yes" => Ok(true),
                "off" | "false" | "0" | "no" | "" => Ok(false),
                other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
            }
        }

        fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}

fn de_length<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LengthVisitor;

    impl de::Visitor<'_> for LengthVisitor {
        type Value = Option<i64>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer password length")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            i64::try_from(v)
                .map(Some)
                .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let v = v.trim();
            if v.is_empty() {
                return Ok(None);
            }
            v.parse::<i64>()
                .map(Some)
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(LengthVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> LengthBounds {
        LengthBounds::default()
    }

    #[test]
    fn generates_exact_length_from_selected_classes() {
        let policy = GenerationPolicy::new(40)
            .with_lowercase()
            .with_digits()
            .check(bounds())
            .unwrap();
        for _ in 0..50 {
            let pw = generate(&policy).unwrap();
            assert_eq!(pw.chars().count(), 40);
            assert!(
                pw.chars()
                    .all(|c| CharClass::Lowercase.contains(c) || CharClass::Digits.contains(c)),
                "unexpected char in {pw}"
            );
        }
    }

    #[test]
    fn symbols_only_policy_uses_symbol_set() {
        let policy = GenerationPolicy::new(64).with_symbols().check(bounds()).unwrap();
        let pw = generate(&policy).unwrap();
        assert!(pw.chars().all(|c| CharClass::Symbols.contains(c)));
    }

    #[test]
    fn two_generations_differ() {
        let policy = GenerationPolicy::new(32)
            .with_lowercase()
            .with_uppercase()
            .with_digits()
            .check(bounds())
            .unwrap();
        assert_ne!(generate(&policy).unwrap(), generate(&policy).unwrap());
    }

    #[test]
    fn require_each_class_covers_every_class() {
        let policy = GenerationPolicy::new(4)
            .with_lowercase()
            .with_uppercase()
            .with_digits()
            .with_symbols()
            .with_each_class_required()
            .check(bounds())
            .unwrap();
        for _ in 0..100 {
            let pw = generate(&policy).unwrap();
            for class in CharClass::ALL {
                assert!(pw.chars().any(|c| class.contains(c)), "{pw} lacks {class:?}");
            }
        }
    }

    #[test]
    fn require_each_class_needs_room() {
        let err = GenerationPolicy::new(2)
            .with_lowercase()
            .with_uppercase()
            .with_digits()
            .with_each_class_required()
            .check(bounds())
            .unwrap_err();
        assert!(matches!(err, PassforgeError::InvalidConfiguration(_)));
    }

    #[test]
    fn no_class_is_rejected() {
        let err = GenerationPolicy::new(12).check(bounds()).unwrap_err();
        assert!(err.to_string().contains("character class"));
    }

    #[test]
    fn non_positive_length_is_rejected() {
        for length in [0, -5] {
            let input = PolicyInput {
                length: Some(length),
                lowercase: true,
                ..Default::default()
            };
            assert!(GenerationPolicy::validate(&input, 12, bounds()).is_err());
        }
    }

    #[test]
    fn length_outside_bounds_is_rejected() {
        let input = PolicyInput {
            length: Some(129),
            digits: true,
            ..Default::default()
        };
        let err = GenerationPolicy::validate(&input, 12, bounds()).unwrap_err();
        assert!(err.to_string().contains("between 1 and 128"));
    }

    #[test]
    fn missing_length_uses_default() {
        let input = PolicyInput {
            uppercase: true,
            ..Default::default()
        };
        let policy = GenerationPolicy::validate(&input, 16, bounds()).unwrap();
        assert_eq!(policy.length(), 16);
    }

    #[test]
    fn input_accepts_json_booleans_and_form_checkboxes() {
        let json: PolicyInput =
            serde_json::from_str(r#"{"length":12,"digits":true,"lowercase":true}"#).unwrap();
        assert_eq!(json.length, Some(12));
        assert!(json.digits && json.lowercase && !json.symbols);

        let quoted: PolicyInput =
            serde_json::from_str(r#"{"length":"20","symbols":"on"}"#).unwrap();
        assert_eq!(quoted.length, Some(20));
        assert!(quoted.symbols);
    }

    #[test]
    fn display_lists_selected_classes() {
        let policy = GenerationPolicy::new(8)
            .with_uppercase()
            .with_digits()
            .check(bounds())
            .unwrap();
        assert_eq!(policy.to_string(), "8 chars, uppercase+digits");
    }
}
