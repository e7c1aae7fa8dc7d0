//! Member key codec and input deduplication.

use std::collections::HashSet;

/// Value stored under every member key.
///
/// The store cannot hold empty values, so presence is marked with one byte.
pub const SENTINEL_VALUE: &[u8] = &[0];

/// Byte separating a set's data prefix from the member bytes.
pub(crate) const MEMBER_SEPARATOR: u8 = b':';

/// Prefix shared by every member key of the set whose data prefix is `data_prefix`.
pub fn member_prefix(data_prefix: &[u8]) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(data_prefix.len() + 1);
    prefix.extend_from_slice(data_prefix);
    prefix.push(MEMBER_SEPARATOR);
    prefix
}

/// Store key of `member` in the set whose data prefix is `data_prefix`.
pub fn member_key(data_prefix: &[u8], member: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(data_prefix.len() + 1 + member.len());
    key.extend_from_slice(data_prefix);
    key.push(MEMBER_SEPARATOR);
    key.extend_from_slice(member);
    key
}

/// Keep the first occurrence of every member, in input order.
pub fn dedup_members<M: AsRef<[u8]>>(members: &[M]) -> Vec<&[u8]> {
    let mut seen = HashSet::with_capacity(members.len());
    members.iter().map(AsRef::as_ref).filter(|member| seen.insert(*member)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_key_layout() {
        assert_eq!(member_key(b"ns:0:D:id", b"alice"), b"ns:0:D:id:alice");
        assert_eq!(member_key(b"ns:0:D:id", b""), b"ns:0:D:id:");
        assert!(member_key(b"p", b"x").starts_with(&member_prefix(b"p")));
    }

    #[test]
    fn test_member_bytes_are_opaque() {
        let key = member_key(b"p", b"a:b\x00\xff");
        assert_eq!(&key[member_prefix(b"p").len()..], b"a:b\x00\xff");
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_order() {
        let members = ["b", "a", "b", "c", "a"];
        assert_eq!(dedup_members(&members), vec![b"b".as_slice(), b"a", b"c"]);
    }

    #[test]
    fn test_dedup_empty_and_binary() {
        let empty: [&[u8]; 0] = [];
        assert!(dedup_members(&empty).is_empty());

        let members = vec![vec![0u8], vec![0u8, 0], vec![0u8]];
        assert_eq!(dedup_members(&members), vec![[0u8].as_slice(), &[0, 0]]);
    }
}
