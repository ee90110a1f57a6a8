//! Built-in demo deck for trying the app without an API key.

use crate::types::{Difficulty, Flashcard};

fn card(front: &str, back: &str, difficulty: Difficulty, category: &str) -> Flashcard {
    Flashcard {
        id: None,
        front: front.to_string(),
        back: back.to_string(),
        category: category.to_string(),
        difficulty,
    }
}

/// Fixed 10-card French starter deck. Carries no backend ids, so demo
/// sessions never report progress.
pub fn demo_deck() -> Vec<Flashcard> {
    use Difficulty::{Easy, Medium};
    vec![
        card("Hello", "Bonjour", Easy, "Greetings"),
        card("How are you?", "Comment allez-vous?", Medium, "Greetings"),
        card("My name is...", "Je m'appelle...", Easy, "Introductions"),
        card("Mother", "Mère", Easy, "Family"),
        card("Father", "Père", Easy, "Family"),
        card("Brother", "Frère", Easy, "Family"),
        card("Sister", "Sœur", Easy, "Family"),
        card("Goodbye", "Au revoir", Easy, "Greetings"),
        card("Please", "S'il vous plaît", Medium, "Politeness"),
        card("Thank you very much", "Merci beaucoup", Medium, "Politeness"),
    ]
}
