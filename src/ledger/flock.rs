//! The flock: profiles of the birds whose eggs are logged.

use serde::{Deserialize, Serialize};

/// Image shown for every quail until individual photos exist.
pub const DEFAULT_QUAIL_IMAGE: &str = "/images/quail.png";

/// Sex of a bird.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Not yet determined.
    Unknown,
}

/// Profile card for one bird.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuailProfile {
    /// Stable identifier (`q1`, `q2`, ...).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Sex.
    pub sex: Sex,
    /// Short description.
    pub bio: String,
    /// Favourite food.
    pub favorite_food: String,
    /// Image path.
    pub image_src: String,
}

const FLOCK: [(Sex, &str, &str); 12] = [
    (Sex::Male, "Loves to perch on the highest spot and survey his domain. Confident and calm.", "Sunflower seeds"),
    (Sex::Female, "Always grooming others in the flock. A nurturing and social quail.", "Mealworms"),
    (Sex::Male, "The fastest runner in the group. Darting between shadows is his specialty.", "Cracked corn"),
    (Sex::Female, "Quiet and observant, she watches before she acts. Wise beyond her years.", "Millet"),
    (Sex::Male, "Always curious and poking his beak into new places. Trouble follows.", "Berries"),
    (Sex::Female, "Loves to sunbathe and nap in the warmest spot she can find.", "Fresh greens"),
    (Sex::Male, "Very vocal and sings to the sunrise every morning. A true morning bird.", "Oats"),
    (Sex::Female, "Bold and fearless, she once chased off a curious cat.", "Insects"),
    (Sex::Male, "A prankster of the flock, known for stealing bits of straw.", "Rice grains"),
    (Sex::Female, "Loves nesting and arranging feathers just right. A perfectionist.", "Pumpkin seeds"),
    (Sex::Male, "A gentle giant who always lets others eat first.", "Peas"),
    (Sex::Female, "Mysterious and often active at dusk, she chirps soft lullabies.", "Small insects"),
];

/// The resident flock, in id order.
pub fn default_flock() -> Vec<QuailProfile> {
    FLOCK
        .iter()
        .enumerate()
        .map(|(i, (sex, bio, food))| QuailProfile {
            id: format!("q{}", i + 1),
            name: format!("Quail{}", i + 1),
            sex: *sex,
            bio: bio.to_string(),
            favorite_food: food.to_string(),
            image_src: DEFAULT_QUAIL_IMAGE.to_string(),
        })
        .collect()
}

/// Look up a profile by id.
pub fn find_quail<'a>(flock: &'a [QuailProfile], id: &str) -> Option<&'a QuailProfile> {
    flock.iter().find(|quail| quail.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flock_roster() {
        let flock = default_flock();
        assert_eq!(flock.len(), 12);
        assert_eq!(flock[0].id, "q1");
        assert_eq!(flock[0].name, "Quail1");
        assert_eq!(flock[11].favorite_food, "Small insects");

        let females = flock.iter().filter(|q| q.sex == Sex::Female).count();
        assert_eq!(females, 6);
    }

    #[test]
    fn test_find_quail() {
        let flock = default_flock();
        assert_eq!(find_quail(&flock, "q7").map(|q| q.favorite_food.as_str()), Some("Oats"));
        assert!(find_quail(&flock, "q13").is_none());
    }
}
