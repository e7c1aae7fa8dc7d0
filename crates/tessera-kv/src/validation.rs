//! Size and shape checks applied before a write reaches a backend.

use crate::constants::MAX_BATCH_KEYS;
use crate::constants::MAX_KEY_SIZE;
use crate::constants::MAX_VALUE_SIZE;
use crate::error::KvError;

/// Validate a key against the fixed size limits.
pub fn check_key(key: &[u8]) -> Result<(), KvError> {
    if key.is_empty() {
        return Err(KvError::EmptyKey);
    }
    if key.len() > MAX_KEY_SIZE as usize {
        return Err(KvError::KeyTooLarge {
            size: key.len(),
            max: MAX_KEY_SIZE,
        });
    }
    Ok(())
}

/// Validate a key/value pair for `set`.
pub fn check_write(key: &[u8], value: &[u8]) -> Result<(), KvError> {
    check_key(key)?;
    if value.is_empty() {
        return Err(KvError::EmptyValue { key: key.to_vec() });
    }
    if value.len() > MAX_VALUE_SIZE as usize {
        return Err(KvError::ValueTooLarge {
            size: value.len(),
            max: MAX_VALUE_SIZE,
        });
    }
    Ok(())
}

/// Validate the number of keys in a batch read.
pub fn check_batch(len: usize) -> Result<(), KvError> {
    if len > MAX_BATCH_KEYS as usize {
        return Err(KvError::BatchTooLarge {
            size: len,
            max: MAX_BATCH_KEYS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(check_key(b""), Err(KvError::EmptyKey)));
    }

    #[test]
    fn test_key_at_limit_accepted() {
        let key = vec![b'k'; MAX_KEY_SIZE as usize];
        assert!(check_key(&key).is_ok());
    }

    #[test]
    fn test_key_over_limit_rejected() {
        let key = vec![b'k'; MAX_KEY_SIZE as usize + 1];
        assert!(matches!(check_key(&key), Err(KvError::KeyTooLarge { size, .. }) if size == key.len()));
    }

    #[test]
    fn test_empty_value_rejected() {
        assert!(matches!(check_write(b"k", b""), Err(KvError::EmptyValue { .. })));
    }

    #[test]
    fn test_value_over_limit_rejected() {
        let value = vec![0u8; MAX_VALUE_SIZE as usize + 1];
        assert!(matches!(check_write(b"k", &value), Err(KvError::ValueTooLarge { .. })));
    }

    #[test]
    fn test_batch_limit() {
        assert!(check_batch(MAX_BATCH_KEYS as usize).is_ok());
        assert!(matches!(check_batch(MAX_BATCH_KEYS as usize + 1), Err(KvError::BatchTooLarge { .. })));
    }
}
