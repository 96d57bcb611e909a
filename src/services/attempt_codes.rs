use rand::Rng;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub(crate) const CODE_LEN: usize = 8;

/// Public attempt code: eight characters drawn uniformly from `A-Z0-9`.
pub(crate) fn generate_attempt_code() -> String {
    generate_with(&mut rand::thread_rng())
}

pub(crate) fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut output = String::with_capacity(CODE_LEN);
    for _ in 0..CODE_LEN {
        let index = rng.gen_range(0..ALPHABET.len());
        output.push(ALPHABET[index] as char);
    }
    output
}

/// Canonical form of user-supplied codes: trimmed and upper-cased.
pub(crate) fn normalize_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

pub(crate) fn is_valid_attempt_code(code: &str) -> bool {
    code.len() == CODE_LEN && code.bytes().all(|byte| ALPHABET.contains(&byte))
}
