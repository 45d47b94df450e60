use suffix_tree::SuffixTree;

fn main() {
    // build a suffix tree from a string
    let tree = SuffixTree::new("the quick brown fox was quick.").unwrap();
    // This is what a suffix tree looks like!
    print!("{:?}", tree);

    // If we want to find the substring "quick" then we should get
    // two results back. The first is the 4th index, the 2nd is at
    // the 24th index of the original string.
    let mut result: Vec<usize> = tree.matches("quick").collect();
    result.sort();
    println!("search result: {:?}", result);
    assert_eq!(result, vec![4, 24]);

    // print the contents of the result
    for i in result {
        println!("quick found! Starts at index: {}", i);
    }

    // one leaf per suffix, including the sentinel-only one
    println!("leaves: {}", tree.leaf_count());
}
