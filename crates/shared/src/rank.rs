/// Anything displayed in rank order: aisles within a location, products within an aisle.
pub trait Ranked {
    fn id(&self) -> i64;
    fn rank(&self) -> i32;
    fn set_rank(&mut self, rank: i32);
}

/// Sorts by rank, ties broken by id.
pub fn sort_by_rank<T: Ranked>(items: &mut [T]) {
    items.sort_by_key(|item| (item.rank(), item.id()));
}

/// Rank after the highest one in `items`, `1` when empty.
pub fn next_rank<T: Ranked>(items: &[T]) -> i32 {
    items.iter().map(Ranked::rank).max().map_or(1, |rank| rank + 1)
}

/// Assigns ranks `1..=n` following the current order.
pub fn reindex<T: Ranked>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_rank(index as i32 + 1);
    }
}

/// Moves the item at `from` to `to`, reindexes, and returns only the items
/// whose rank changed. Out of range positions leave everything untouched.
pub fn move_to<T: Ranked + Clone>(mut items: Vec<T>, from: usize, to: usize) -> Vec<T> {
    if from >= items.len() || to >= items.len() {
        return vec![];
    }

    sort_by_rank(&mut items);
    let before = items
        .iter()
        .map(|item| (item.id(), item.rank()))
        .collect::<Vec<_>>();

    let item = items.remove(from);
    items.insert(to, item);
    reindex(&mut items);

    items
        .into_iter()
        .filter(|item| {
            !before
                .iter()
                .any(|(id, rank)| *id == item.id() && *rank == item.rank())
        })
        .collect()
}
