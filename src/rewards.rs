use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub id: u32,
    pub title: String,
    pub cost: i64,
}

pub fn default_catalog() -> Vec<Reward> {
    [
        (1, "Favourite coffee", 100),
        (2, "Movie night", 250),
        (3, "New book", 400),
        (4, "Cheat meal", 600),
        (5, "Spa day", 1500),
    ]
    .into_iter()
    .map(|(id, title, cost)| Reward {
        id,
        title: title.to_string(),
        cost,
    })
    .collect()
}

pub fn find_reward(catalog: &[Reward], id: u32) -> Option<&Reward> {
    catalog.iter().find(|reward| reward.id == id)
}
