/// Stable insertion sort with a key extraction function.
///
/// Elements with equal keys keep their relative order, which is what makes
/// "ties broken by insertion order" hold for handler chains.
///
/// # Examples
///
/// ```
/// use json_chain_util::sort::insertion_sort_by_key;
///
/// let mut arr = vec![("b", 2), ("a", 1), ("c", 2), ("d", 1)];
/// insertion_sort_by_key(&mut arr, |&(_, k)| k);
/// assert_eq!(arr, vec![("a", 1), ("d", 1), ("b", 2), ("c", 2)]);
/// ```
pub fn insertion_sort_by_key<T, K, F>(arr: &mut [T], mut key: F)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    for i in 1..arr.len() {
        let k = key(&arr[i]);
        let mut j = i;
        while j > 0 && key(&arr[j - 1]) > k {
            j -= 1;
        }
        // Shift the run [j, i) right by one and drop element i into place.
        arr[j..=i].rotate_right(1);
    }
}
