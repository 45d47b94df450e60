use quickcheck::{QuickCheck, TestResult};
use suffix_tree::{Error, NodeId, SuffixTree, SENTINEL};

fn ukkonen(text: &str) -> SuffixTree {
    SuffixTree::new(text).unwrap()
}

fn naive(text: &str) -> SuffixTree {
    SuffixTree::new_naive(text).unwrap()
}

// These tests assume the correctness of the `naive` method of building a
// suffix tree. (It's only a couple dozen lines of code and probably
// difficult to get wrong.)

fn positions(tree: &SuffixTree, pattern: &str) -> Vec<usize> {
    let mut found: Vec<usize> = tree.matches(pattern).collect();
    found.sort_unstable();
    found
}

/// Byte-level scan oracle: every starting offset where `pattern` occurs,
/// overlaps included.
fn scan(text: &str, pattern: &str) -> Vec<usize> {
    let (text, pattern) = (text.as_bytes(), pattern.as_bytes());
    if pattern.is_empty() {
        return (0..text.len()).collect();
    }
    if pattern.len() > text.len() {
        return vec![];
    }
    (0..=text.len() - pattern.len())
        .filter(|&i| &text[i..i + pattern.len()] == pattern)
        .collect()
}

/// Prefix-function occurrence counting, for counting against a second,
/// independent oracle.
fn kmp_count(text: &str, pattern: &str) -> usize {
    let (text, pattern) = (text.as_bytes(), pattern.as_bytes());
    if pattern.is_empty() {
        return text.len();
    }
    let mut fail = vec![0usize; pattern.len()];
    for i in 1..pattern.len() {
        let mut k = fail[i - 1];
        while k > 0 && pattern[i] != pattern[k] {
            k = fail[k - 1];
        }
        if pattern[i] == pattern[k] {
            k += 1;
        }
        fail[i] = k;
    }
    let mut count = 0;
    let mut k = 0;
    for &b in text {
        while k > 0 && b != pattern[k] {
            k = fail[k - 1];
        }
        if b == pattern[k] {
            k += 1;
        }
        if k == pattern.len() {
            count += 1;
            k = fail[k - 1];
        }
    }
    count
}

/// Canonical tree shape: preorder list of (edge label, leaf position).
/// Children are kept sorted by first byte, so two structurally identical
/// trees produce equal shapes regardless of arena numbering.
fn shape(tree: &SuffixTree) -> Vec<(Vec<u8>, Option<usize>)> {
    tree.preorder(tree.root())
        .map(|id| (tree.label(id).to_vec(), tree.suffix_pos(id)))
        .collect()
}

/// Root-to-leaf label concatenations, keyed by leaf position.
fn suffixes_by_pos(tree: &SuffixTree) -> Vec<(usize, Vec<u8>)> {
    let mut out = Vec::new();
    let mut stack: Vec<(NodeId, Vec<u8>)> = vec![(tree.root(), Vec::new())];
    while let Some((id, prefix)) = stack.pop() {
        let mut path = prefix;
        path.extend_from_slice(tree.label(id));
        if let Some(pos) = tree.suffix_pos(id) {
            out.push((pos, path));
        } else {
            for child in tree.children(id) {
                stack.push((child, path.clone()));
            }
        }
    }
    out.sort();
    out
}

/// Strips the reserved sentinel out of quickcheck's arbitrary strings.
fn cleanse(s: &str) -> String {
    s.chars().filter(|&c| c != SENTINEL as char).collect()
}

#[test]
fn basic1() {
    let tree = ukkonen("cacao");
    assert!(tree.is_match("ca"));
    assert_eq!(positions(&tree, "ca"), vec![0, 2]);
    assert_eq!(positions(&tree, "cao"), vec![2]);
    assert!(!tree.is_match("cc"));
}

#[test]
fn basic2() {
    let tree = ukkonen("aabxaabk");
    assert_eq!(positions(&tree, "aab"), vec![0, 4]);
    assert_eq!(tree.matches("aab").count(), 2);
}

#[test]
fn basic3() {
    let tree = ukkonen("banana");
    assert_eq!(tree.leaf_count(), 7);
    assert_eq!(positions(&tree, "ana"), vec![1, 3]);
    assert_eq!(positions(&tree, "banana"), vec![0]);
}

#[test]
fn repetitive_text_agrees_with_both_oracles() {
    let text = "xyxyxxxxzyyxyxy";
    let tree = ukkonen(text);
    for pattern in ["xy", "x", "y", "xx", "yx", "xyx", "zyy", "q"] {
        assert_eq!(positions(&tree, pattern), scan(text, pattern));
        assert_eq!(tree.matches(pattern).count(), kmp_count(text, pattern));
    }
}

#[test]
fn empty_pattern_matches_everywhere() {
    let tree = ukkonen("banana");
    assert!(tree.is_match(""));
    assert_eq!(positions(&tree, ""), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn one_byte_text() {
    let tree = ukkonen("a");
    assert_eq!(tree.leaf_count(), 2);
    assert_eq!(positions(&tree, "a"), vec![0]);
    assert!(!tree.is_match("b"));
}

#[test]
fn run_of_equal_bytes() {
    let tree = ukkonen("aaaa");
    assert_eq!(tree.leaf_count(), 5);
    assert_eq!(positions(&tree, "a"), vec![0, 1, 2, 3]);
    assert_eq!(positions(&tree, "aa"), vec![0, 1, 2]);
    assert_eq!(positions(&tree, "aaaa"), vec![0]);
    assert!(!tree.is_match("aaaaa"));
}

#[test]
fn unicode_snowman() {
    // The tree indexes bytes; positions are byte offsets.
    let tree = ukkonen("☃abc☃");
    assert!(tree.is_match("☃"));
    assert_eq!(positions(&tree, "☃"), vec![0, 6]);
    assert_eq!(positions(&tree, "abc☃"), vec![3]);
}

#[test]
fn pattern_longer_than_text() {
    let tree = ukkonen("az");
    assert!(!tree.is_match("mnomnomnomnomnomnomno"));
    assert_eq!(
        positions(&tree, "mnomnomnomnomnomnomno"),
        Vec::<usize>::new()
    );
}

#[test]
fn empty_text_is_invalid() {
    assert!(matches!(SuffixTree::new(""), Err(Error::InvalidInput(_))));
}

#[test]
fn sentinel_in_text_is_invalid() {
    assert!(matches!(
        SuffixTree::new("us$d"),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        SuffixTree::new_naive("$"),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn naive_and_ukkonen_agree_on_classics() {
    for text in ["banana", "mississippi", "abcabxabcd", "aaaa", "abab"] {
        assert_eq!(shape(&ukkonen(text)), shape(&naive(text)), "text: {text}");
    }
}

#[test]
fn building_twice_is_deterministic() {
    let a = ukkonen("mississippi");
    let b = ukkonen("mississippi");
    assert_eq!(a.to_dot(), b.to_dot());
}

#[test]
fn dot_output_mentions_every_leaf() {
    let tree = ukkonen("banana");
    let dot = tree.to_dot();
    assert!(dot.starts_with("digraph tree {"));
    assert_eq!(dot.matches("shape=box]").count(), 7);
    for pos in 0..=6 {
        assert!(dot.contains(&format!("[label=\"{}\", shape=box]", pos)));
    }
}

#[test]
fn qc_leaf_count_is_len_plus_one() {
    fn prop(s: String) -> TestResult {
        let s = cleanse(&s);
        if s.is_empty() {
            return TestResult::discard();
        }
        TestResult::from_bool(ukkonen(&s).leaf_count() == s.len() + 1)
    }
    QuickCheck::new()
        .tests(500)
        .max_tests(10000)
        .quickcheck(prop as fn(String) -> TestResult);
}

#[test]
fn qc_tree_enumerates_suffixes() {
    fn prop(s: String) -> TestResult {
        let s = cleanse(&s);
        if s.is_empty() {
            return TestResult::discard();
        }
        let tree = ukkonen(&s);
        let mut full = s.clone().into_bytes();
        full.push(SENTINEL);
        let suffixes = suffixes_by_pos(&tree);
        if suffixes.len() != full.len() {
            return TestResult::failed();
        }
        for (pos, path) in suffixes {
            if path != full[pos..] {
                return TestResult::failed();
            }
        }
        TestResult::passed()
    }
    QuickCheck::new()
        .tests(500)
        .max_tests(10000)
        .quickcheck(prop as fn(String) -> TestResult);
}

#[test]
fn qc_naive_equals_ukkonen() {
    fn prop(s: String) -> TestResult {
        let s = cleanse(&s);
        if s.is_empty() {
            return TestResult::discard();
        }
        TestResult::from_bool(shape(&ukkonen(&s)) == shape(&naive(&s)))
    }
    QuickCheck::new()
        .tests(500)
        .max_tests(10000)
        .quickcheck(prop as fn(String) -> TestResult);
}

#[test]
fn qc_matches_agree_with_scan_on_both_builders() {
    fn prop(s: String, from: usize, to: usize) -> TestResult {
        let s = cleanse(&s);
        if s.is_empty() {
            return TestResult::discard();
        }
        // Carve a pattern out of the text, on char boundaries.
        let mut bounds: Vec<usize> = s.char_indices().map(|(i, _)| i).collect();
        bounds.push(s.len());
        let mut from = bounds[from % bounds.len()];
        let mut to = bounds[to % bounds.len()];
        if from > to {
            std::mem::swap(&mut from, &mut to);
        }
        let pattern = &s[from..to];

        let expected = scan(&s, pattern);
        TestResult::from_bool(
            positions(&ukkonen(&s), pattern) == expected
                && positions(&naive(&s), pattern) == expected,
        )
    }
    QuickCheck::new()
        .tests(500)
        .max_tests(10000)
        .quickcheck(prop as fn(String, usize, usize) -> TestResult);
}

#[test]
fn qc_arbitrary_patterns_agree_with_scan() {
    fn prop(s: String, pattern: String) -> TestResult {
        let s = cleanse(&s);
        let pattern = cleanse(&pattern);
        if s.is_empty() || pattern.is_empty() {
            return TestResult::discard();
        }
        let tree = ukkonen(&s);
        TestResult::from_bool(positions(&tree, &pattern) == scan(&s, &pattern))
    }
    QuickCheck::new()
        .tests(500)
        .max_tests(10000)
        .quickcheck(prop as fn(String, String) -> TestResult);
}

#[test]
fn qc_every_substring_matches() {
    fn prop(s: String, from: usize, to: usize) -> TestResult {
        let s = cleanse(&s);
        if s.is_empty() {
            return TestResult::discard();
        }
        let mut bounds: Vec<usize> = s.char_indices().map(|(i, _)| i).collect();
        bounds.push(s.len());
        let mut from = bounds[from % bounds.len()];
        let mut to = bounds[to % bounds.len()];
        if from > to {
            std::mem::swap(&mut from, &mut to);
        }
        let pattern = &s[from..to];

        let tree = ukkonen(&s);
        if !tree.is_match(pattern) {
            return TestResult::failed();
        }
        // Every prefix of an in-text substring is also a substring.
        for (end, _) in pattern.char_indices() {
            if !tree.is_match(&pattern[..end]) {
                return TestResult::failed();
            }
        }
        TestResult::passed()
    }
    QuickCheck::new()
        .tests(500)
        .max_tests(10000)
        .quickcheck(prop as fn(String, usize, usize) -> TestResult);
}

#[test]
fn qc_shared_prefix_total_matches_pairwise_definition() {
    // The aggregate equals the sum, over the suffixes of text + '$', of
    // the longest prefix each shares with some other suffix.
    fn prop(s: String) -> TestResult {
        let s = cleanse(&s);
        if s.is_empty() || s.len() > 64 {
            return TestResult::discard();
        }
        let tree = ukkonen(&s);
        let mut full = s.clone().into_bytes();
        full.push(SENTINEL);
        let mut expected = 0u64;
        for i in 0..full.len() {
            let mut best = 0;
            for j in 0..full.len() {
                if i == j {
                    continue;
                }
                let lcp = full[i..]
                    .iter()
                    .zip(full[j..].iter())
                    .take_while(|(a, b)| a == b)
                    .count();
                best = best.max(lcp);
            }
            expected += best as u64;
        }
        TestResult::from_bool(tree.shared_prefix_total() == expected)
    }
    QuickCheck::new()
        .tests(200)
        .max_tests(10000)
        .quickcheck(prop as fn(String) -> TestResult);
}
