use sha2::{Digest, Sha256};

use crate::damage::{AngleType, DamageType};

/// Characters sampled from each end of the encoded image.
const AFFIX_LEN: usize = 100;

/// Separates key fields. The fingerprint is stripped to alphanumerics and the
/// damage/angle tags are fixed identifiers, so no field preceding the
/// free-form instruction (which comes last) can contain this byte.
const FIELD_SEPARATOR: char = '\u{1f}';

/// Cheap structural hash of an encoded image: leading affix + trailing affix
/// + exact length, non-alphanumerics stripped.
///
/// Deliberately weak. Two images sharing prefix, suffix, and length collide;
/// that risk is accepted in exchange for never reading the full payload.
pub fn structural_hash(image: &str) -> String {
    let mut tail: Vec<char> = image
        .chars()
        .rev()
        .take(AFFIX_LEN)
        .filter(char::is_ascii_alphanumeric)
        .collect();
    tail.reverse();

    let mut hash: String = image
        .chars()
        .take(AFFIX_LEN)
        .filter(char::is_ascii_alphanumeric)
        .collect();
    hash.extend(tail);
    hash.push_str(&image.len().to_string());
    hash
}

/// Derives the cache key for one generation request.
///
/// The composed string (never the image payload itself) is digested to a
/// fixed-width hex key.
pub fn cache_key(
    image: &str,
    damage: DamageType,
    instruction: &str,
    angle: Option<AngleType>,
) -> String {
    let fingerprint = structural_hash(image);
    let damage_tag = damage.tag();
    let angle_tag = angle.map(|angle| angle.tag()).unwrap_or("none");
    let composed = format!(
        "{fingerprint}{FIELD_SEPARATOR}{damage_tag}{FIELD_SEPARATOR}{angle_tag}{FIELD_SEPARATOR}{instruction}"
    );
    digest(&composed)
}

fn digest(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

    #[test]
    fn structural_hash_is_alphanumeric() {
        let hash = structural_hash(IMAGE);
        assert!(hash.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(hash.ends_with(&IMAGE.len().to_string()));
    }

    #[test]
    fn structural_hash_distinguishes_length() {
        let a = "A".repeat(300);
        let mut b = a.clone();
        b.push('A');
        assert_ne!(structural_hash(&a), structural_hash(&b));
    }

    #[test]
    fn accepted_collision_on_shared_affixes_and_length() {
        // Differences confined to the middle of equal-length payloads are
        // invisible to the structural hash.
        let a = format!("{}X{}", "A".repeat(150), "B".repeat(150));
        let b = format!("{}Y{}", "A".repeat(150), "B".repeat(150));
        assert_eq!(structural_hash(&a), structural_hash(&b));
    }

    #[test]
    fn key_is_deterministic() {
        let first = cache_key(IMAGE, DamageType::Rust, "hinge", Some(AngleType::Side));
        let second = cache_key(IMAGE, DamageType::Rust, "hinge", Some(AngleType::Side));
        assert_eq!(first, second);
    }

    #[test]
    fn any_field_change_changes_the_key() {
        let base = cache_key(IMAGE, DamageType::Rust, "hinge", Some(AngleType::Side));

        let other_image = format!("{IMAGE}AA");
        assert_ne!(base, cache_key(&other_image, DamageType::Rust, "hinge", Some(AngleType::Side)));
        assert_ne!(base, cache_key(IMAGE, DamageType::Corrosion, "hinge", Some(AngleType::Side)));
        assert_ne!(base, cache_key(IMAGE, DamageType::Rust, "lid", Some(AngleType::Side)));
        assert_ne!(base, cache_key(IMAGE, DamageType::Rust, "hinge", Some(AngleType::Top)));
        assert_ne!(base, cache_key(IMAGE, DamageType::Rust, "hinge", None));
    }

    #[test]
    fn separator_cannot_leak_across_field_boundaries() {
        // An instruction mimicking the tag fields must not collide with a
        // request where those values really are in the tag fields.
        let forged = cache_key(IMAGE, DamageType::Rust, "\u{1f}side\u{1f}x", None);
        let genuine = cache_key(IMAGE, DamageType::Rust, "x", Some(AngleType::Side));
        assert_ne!(forged, genuine);
    }
}
