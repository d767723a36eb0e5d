//! Unique id generation.

use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random lowercase base-36 token of `len` characters.
pub fn random_token<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// Sample `prefix + token` until `taken` rejects nothing.
///
/// `len` must be non-zero, otherwise a taken prefix never terminates.
pub fn generate_uid<R, F>(rng: &mut R, prefix: &str, len: usize, taken: F) -> String
where
    R: Rng + ?Sized,
    F: Fn(&str) -> bool,
{
    debug_assert!(len > 0);
    loop {
        let candidate = format!("{}{}", prefix, random_token(rng, len));
        if !taken(&candidate) {
            return candidate;
        }
        tracing::trace!("uid {} taken, resampling", candidate);
    }
}
