use super::*;
use crate::token::TokenKind;
use pretty_assertions::assert_eq;

// === Hashing ===

#[test]
fn hash_of_empty_is_zero() {
    assert_eq!(ident_hash(""), 0);
}

#[test]
fn hash_ignores_underscores() {
    assert_eq!(ident_hash("foo_bar"), ident_hash("foobar"));
}

#[test]
fn hasher_matches_ident_hash() {
    let mut hasher = IdentHasher::new();
    for &b in b"iterator" {
        hasher.push(b);
    }
    assert_eq!(hasher.finish(), ident_hash("iterator"));
}

#[test]
fn hash_distinguishes_order() {
    assert_ne!(ident_hash("ab"), ident_hash("ba"));
}

// === Reserved ids ===

#[test]
fn empty_string_is_id_zero() {
    let cache = IdentCache::new();
    assert_eq!(cache.get(0).map(Ident::as_str), Some(""));
}

#[test]
fn keywords_occupy_reserved_block() {
    let mut cache = IdentCache::new();
    let addr = cache.intern("addr", ident_hash("addr"));
    let yield_ = cache.intern("yield", ident_hash("yield"));
    assert_eq!(addr.id(), KEYWORD_ID_LOW);
    assert_eq!(yield_.id(), KEYWORD_ID_HIGH);
    assert!(addr.is_keyword());
    assert!(yield_.is_keyword());
}

#[test]
fn keyword_ids_follow_token_kind_order() {
    let mut cache = IdentCache::new();
    for &(kind, text) in KEYWORDS.iter() {
        let ident = cache.intern(text, ident_hash(text));
        assert_eq!(TokenKind::from_ident_id(ident.id()), Some(kind), "{text}");
    }
}

#[test]
fn punct_operators_follow_keywords() {
    let mut cache = IdentCache::new();
    let colon = cache.intern(":", ident_hash(":"));
    let dotdot = cache.intern("..", ident_hash(".."));
    assert_eq!(colon.id(), OPERATOR_ID_LOW);
    assert_eq!(dotdot.id(), OPERATOR_ID_HIGH);
    assert!(colon.is_punct_operator());
    assert!(!colon.is_keyword());
}

#[test]
fn seeded_cache_size() {
    let cache = IdentCache::new();
    assert_eq!(cache.len(), 72);
}

// === Interning ===

#[test]
fn same_text_same_id() {
    let mut cache = IdentCache::new();
    let a = cache.intern("counter", ident_hash("counter"));
    let b = cache.intern("counter", ident_hash("counter"));
    assert_eq!(a, b);
    assert_eq!(a.as_str(), "counter");
}

#[test]
fn new_identifiers_get_fresh_ids() {
    let mut cache = IdentCache::new();
    let a = cache.intern("alpha", ident_hash("alpha"));
    let b = cache.intern("beta", ident_hash("beta"));
    assert_eq!(a.id(), 72);
    assert_eq!(b.id(), 73);
    assert!(!a.is_keyword());
}

#[test]
fn colliding_hashes_are_kept_apart() {
    let mut cache = IdentCache::new();
    let a = cache.intern("one", 7);
    let b = cache.intern("two", 7);
    assert_ne!(a.id(), b.id());
    assert_eq!(cache.lookup("one", 7), Some(a));
    assert_eq!(cache.lookup("two", 7), Some(b));
}

#[test]
fn lookup_does_not_insert() {
    let cache = IdentCache::new();
    assert_eq!(cache.lookup("missing", ident_hash("missing")), None);
    assert_eq!(cache.len(), 72);
}

// === Shared cache ===

#[test]
fn shared_clones_see_same_table() {
    let mut a = SharedIdentCache::new();
    let mut b = a.clone();
    let x = a.intern("shared", ident_hash("shared"));
    let y = b.intern("shared", ident_hash("shared"));
    assert_eq!(x, y);
    assert_eq!(a.get(x.id()), Some(x));
}

#[test]
fn shared_cache_across_threads() {
    let cache = SharedIdentCache::new();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let mut cache = cache.clone();
            std::thread::spawn(move || {
                (0..50)
                    .map(|i| {
                        let text = format!("name{i}");
                        cache.intern(&text, ident_hash(&text)).id()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    let results: Vec<Vec<u32>> = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();
    for ids in &results[1..] {
        assert_eq!(ids, &results[0]);
    }
    assert_eq!(cache.len(), 72 + 50);
}
