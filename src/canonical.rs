use crate::graph::BrandRelationshipMap;

/// Picks the representative name for `brand`'s home group.
///
/// The home group is `{K} ∪ graph[K]` for the first key `K` (in insertion
/// order) that is `brand` or lists it as an alias; the smallest member wins.
/// Brands outside the graph are their own canonical id. Only direct edges are
/// considered, so brands linked through a third brand may resolve differently.
pub fn resolve_canonical(brand: &str, graph: &BrandRelationshipMap) -> String {
    let brand = brand.to_lowercase();

    let home = graph
        .iter()
        .find(|(key, _)| *key == brand || graph.is_related(key, &brand));

    match home {
        Some((key, related)) => related
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(key))
            .min()
            .unwrap_or(key)
            .to_string(),
        None => brand,
    }
}
