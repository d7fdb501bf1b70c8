//! Base-36 slugs for roll permalinks.

/// Slugs are zero-padded to at least this many characters.
pub const MIN_SLUG_LEN: usize = 4;

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Render an id as a lowercase base-36 token, left-padded with `0` to
/// [`MIN_SLUG_LEN`].  No upper bound: larger ids just produce longer slugs.
pub fn id_to_slug(id: i64) -> String {
    let mut n = id.max(0) as u64;
    let mut buf = Vec::new();
    loop {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    while buf.len() < MIN_SLUG_LEN {
        buf.push(b'0');
    }
    buf.reverse();
    String::from_utf8(buf).expect("base-36 digits are ASCII")
}

/// Decode a base-36 slug back to an id.  Invalid input decodes to 0, which
/// no record ever carries.
pub fn slug_to_id(slug: &str) -> i64 {
    i64::from_str_radix(slug, 36).unwrap_or(0)
}
