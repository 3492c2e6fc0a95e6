pub mod policy_card_click;
pub mod policy_card_click_count;

pub use policy_card_click::Entity as PolicyCardClickEntity;
pub use policy_card_click_count::Entity as PolicyCardClickCountEntity;
