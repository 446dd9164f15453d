use serde::{Deserialize, Serialize};

pub const FAMOUS_PEOPLE_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Car {
    pub make: String,
    pub model: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Person {
    pub name: String,
    pub address: String,
    pub cars: Vec<Car>,
}

impl Car {
    fn numbered(n: u32) -> Self {
        Self {
            make: format!("Make{}", n),
            model: format!("Model{}", n),
            color: format!("Color{}", n),
        }
    }
}

// Every person owns the same three cars.
pub fn fixed_cars() -> Vec<Car> {
    (1..=3).map(Car::numbered).collect()
}

pub fn famous_person(index: usize) -> Person {
    Person {
        name: format!("FamousPerson{}", index),
        address: format!("FamousPerson{}'s Address", index),
        cars: fixed_cars(),
    }
}

/// The sample dataset, in insertion order.
pub fn famous_people() -> Vec<Person> {
    (0..FAMOUS_PEOPLE_COUNT).map(famous_person).collect()
}
