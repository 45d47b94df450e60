use suffix_tree::SuffixTree;

fn main() {
    let tree = SuffixTree::new("the quick brown fox was quick.").unwrap();
    let mut positions: Vec<usize> = tree.matches("quick").collect();
    positions.sort();
    assert_eq!(positions, vec![4, 24]);
}
