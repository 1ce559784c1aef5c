//! Random field synthesis with fixed format rules.
//!
//! Every function draws from the caller's rng so a seeded run stays fully
//! deterministic, including the uuid-format identifiers.

use chrono::{Duration, NaiveDateTime};
use rand::Rng;

use catchtrace_core::LineageKey;

use crate::errors::GenerationError;

pub const SPECIES: &[&str] = &["Salmon", "Cod", "Tuna"];

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Numeric-digit string of the requested length.
pub fn digit_string(rng: &mut impl Rng, length: usize) -> Result<String, GenerationError> {
    if length == 0 {
        return Err(GenerationError::InvalidParameter(
            "digit string length must be positive".to_string(),
        ));
    }
    Ok((0..length)
        .map(|_| char::from(b'0' + rng.random_range(0..=9)))
        .collect())
}

/// 14-digit product code.
pub fn product_code(rng: &mut impl Rng) -> String {
    fixed_digits(rng, 14)
}

/// 13-digit participant code.
pub fn participant_code(rng: &mut impl Rng) -> String {
    fixed_digits(rng, 13)
}

/// 18-digit pallet code, always starting with "0".
pub fn pallet_code(rng: &mut impl Rng) -> String {
    let mut code = String::with_capacity(18);
    code.push('0');
    code.push_str(&fixed_digits(rng, 17));
    code
}

/// Serial or batch number: 2 digits followed by 1..=21 uppercase letters.
pub fn serial_number(rng: &mut impl Rng) -> String {
    let letters = rng.random_range(1..=21);
    let mut serial = fixed_digits(rng, 2);
    for _ in 0..letters {
        serial.push(char::from(UPPERCASE[rng.random_range(0..UPPERCASE.len())]));
    }
    serial
}

/// Mixed-case free text of the requested length.
pub fn free_text(rng: &mut impl Rng, length: usize) -> Result<String, GenerationError> {
    if length == 0 {
        return Err(GenerationError::InvalidParameter(
            "text length must be positive".to_string(),
        ));
    }
    Ok((0..length)
        .map(|_| char::from(LETTERS[rng.random_range(0..LETTERS.len())]))
        .collect())
}

/// Uppercase code of the requested length (packing type codes and the like).
pub fn upper_code(rng: &mut impl Rng, length: usize) -> Result<String, GenerationError> {
    if length == 0 {
        return Err(GenerationError::InvalidParameter(
            "code length must be positive".to_string(),
        ));
    }
    Ok((0..length)
        .map(|_| char::from(UPPERCASE[rng.random_range(0..UPPERCASE.len())]))
        .collect())
}

/// Landed catch weight in kg.
pub fn catch_weight(rng: &mut impl Rng) -> i64 {
    rng.random_range(500..=10000)
}

/// Processing batch quantity.
pub fn batch_quantity(rng: &mut impl Rng) -> i64 {
    rng.random_range(100..=500)
}

/// Per-pack quantity, a quarter of a processing batch.
pub fn pack_quantity(rng: &mut impl Rng) -> i64 {
    rng.random_range(100..=500) / 4
}

pub fn net_content(rng: &mut impl Rng) -> i64 {
    rng.random_range(0..=9)
}

/// Cold-chain transport temperature, one decimal place.
pub fn transport_temperature(rng: &mut impl Rng) -> f64 {
    round1(rng.random_range(-10.0..0.0))
}

/// Gross shipment weight in kg, one decimal place.
pub fn gross_weight(rng: &mut impl Rng) -> f64 {
    round1(rng.random_range(10.0..100.0))
}

/// Retail unit price, two decimal places.
pub fn retail_price(rng: &mut impl Rng) -> f64 {
    (rng.random_range(3.0_f64..50.0) * 100.0).round() / 100.0
}

/// Conservation reference size, e.g. "34cm".
pub fn conservation_size(rng: &mut impl Rng) -> String {
    format!("{}cm", rng.random_range(10..=50))
}

pub fn species(rng: &mut impl Rng) -> &'static str {
    SPECIES[rng.random_range(0..SPECIES.len())]
}

/// Uuid-format identifier minted from the caller's rng.
pub fn event_id(rng: &mut impl Rng) -> String {
    random_uuid(rng)
}

/// Fresh lineage key, uuid format.
pub fn lineage_key(rng: &mut impl Rng) -> LineageKey {
    LineageKey::new(random_uuid(rng))
}

/// Timestamp one day after its causal predecessor.
pub fn day_after(time: NaiveDateTime) -> NaiveDateTime {
    time + Duration::days(1)
}

pub fn days_after(time: NaiveDateTime, days: i64) -> NaiveDateTime {
    time + Duration::days(days)
}

fn fixed_digits(rng: &mut impl Rng, length: usize) -> String {
    (0..length)
        .map(|_| char::from(b'0' + rng.random_range(0..=9)))
        .collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn random_uuid(rng: &mut impl Rng) -> String {
    let mut bytes = [0_u8; 16];
    rng.fill_bytes(&mut bytes);
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    uuid::Uuid::from_bytes(bytes).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    #[test]
    fn codes_match_their_formats() {
        let mut rng = rng();
        let product = product_code(&mut rng);
        assert_eq!(product.len(), 14);
        assert!(product.chars().all(|c| c.is_ascii_digit()));

        let participant = participant_code(&mut rng);
        assert_eq!(participant.len(), 13);

        let pallet = pallet_code(&mut rng);
        assert_eq!(pallet.len(), 18);
        assert!(pallet.starts_with('0'));
    }

    #[test]
    fn serial_numbers_are_two_digits_then_uppercase() {
        let mut rng = rng();
        for _ in 0..50 {
            let serial = serial_number(&mut rng);
            assert!(serial.len() >= 3 && serial.len() <= 23);
            assert!(serial[..2].chars().all(|c| c.is_ascii_digit()));
            assert!(serial[2..].chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn zero_lengths_are_rejected() {
        let mut rng = rng();
        assert!(digit_string(&mut rng, 0).is_err());
        assert!(free_text(&mut rng, 0).is_err());
        assert!(upper_code(&mut rng, 0).is_err());
    }

    #[test]
    fn numeric_ranges_hold() {
        let mut rng = rng();
        for _ in 0..100 {
            let weight = catch_weight(&mut rng);
            assert!((500..=10000).contains(&weight));
            let temp = transport_temperature(&mut rng);
            assert!((-10.0..=0.0).contains(&temp));
            let price = retail_price(&mut rng);
            assert!((3.0..=50.0).contains(&price));
        }
    }

    #[test]
    fn seeded_ids_are_deterministic() {
        let mut a = rng();
        let mut b = rng();
        assert_eq!(event_id(&mut a), event_id(&mut b));
        assert_eq!(lineage_key(&mut a), lineage_key(&mut b));
    }
}
