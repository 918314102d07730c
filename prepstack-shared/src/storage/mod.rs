/// Object-storage helpers
///
/// - `presign`: AWS SigV4 presigned PUT URL generation

pub mod presign;

/// Builds a collision-free object key for an upload
///
/// Layout: `{prefix}/{owner}/{random}-{sanitized file name}`. The random
/// component makes re-uploads of the same file name distinct; the file name
/// is reduced to a safe character set.
pub fn generate_object_key(prefix: &str, owner: &str, file_name: &str) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    let random: String = (0..12)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();

    let sanitized: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!("{}/{}/{}-{}", prefix, owner, random, sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_object_key_shape() {
        let key = generate_object_key("profile", "user-1", "my photo.png");

        assert!(key.starts_with("profile/user-1/"));
        assert!(key.ends_with("-my_photo.png"));
    }

    #[test]
    fn test_generate_object_key_is_unique_per_call() {
        let a = generate_object_key("profile", "u", "a.png");
        let b = generate_object_key("profile", "u", "a.png");
        assert_ne!(a, b);
    }
}
