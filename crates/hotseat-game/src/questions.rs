//! Static question bank

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// One trivia question with its canonical answer and optional fixed choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl Question {
    fn new(text: &str, answer: &str, options: &[&str]) -> Self {
        Self {
            text: text.to_string(),
            answer: answer.to_string(),
            options: if options.is_empty() {
                None
            } else {
                Some(options.iter().map(|o| o.to_string()).collect())
            },
        }
    }
}

static QUESTION_BANK: LazyLock<Vec<Question>> = LazyLock::new(|| {
    vec![
        Question::new(
            "True or False: An AI developed by Google DeepMind called AlphaGo defeated the \
             human world champion in the game of Go.",
            "True",
            &["True", "False"],
        ),
        Question::new(
            "Myth or Fact: AI systems can actually 'feel' emotions just like humans do.",
            "Myth",
            &["Myth", "Fact"],
        ),
        Question::new(
            "True or False: The term 'Artificial Intelligence' was first coined in the 1950s.",
            "True",
            &["True", "False"],
        ),
        Question::new(
            "Myth or Fact: AI will inevitably replace all human jobs within the next 10 years.",
            "Myth",
            &["Myth", "Fact"],
        ),
        Question::new(
            "True or False: Machine Learning is a subset of Artificial Intelligence.",
            "True",
            &["True", "False"],
        ),
        Question::new(
            "What does the 'GPT' in ChatGPT stand for: 'General Purpose Technology', \
             'Generative Pre-trained Transformer', or 'Guided Processing Tool'?",
            "Generative Pre-trained Transformer",
            &[
                "General Purpose Technology",
                "Generative Pre-trained Transformer",
                "Guided Processing Tool",
            ],
        ),
        Question::new(
            "Myth or Fact: AI models like ChatGPT perfectly understand the meaning of words \
             just like humans do.",
            "Myth",
            &["Myth", "Fact"],
        ),
        Question::new(
            "True or False: A Turing Test is used to determine whether a machine can exhibit \
             human-like intelligence.",
            "True",
            &["True", "False"],
        ),
        Question::new(
            "Myth or Fact: If an AI gives an answer with absolute confidence, it means the \
             answer is always 100% correct.",
            "Myth",
            &["Myth", "Fact"],
        ),
        Question::new(
            "True or False: Neural networks in AI are loosely inspired by the structure of \
             the human brain.",
            "True",
            &["True", "False"],
        ),
    ]
});

/// The full question bank, in index order.
pub fn bank() -> &'static [Question] {
    &QUESTION_BANK
}

/// Draw a random question whose index is not in `asked`. Once every index
/// has been asked the filter is dropped and repeats become possible.
pub fn draw(asked: &[usize], rng: &mut impl Rng) -> (Question, usize) {
    let bank = bank();
    let available: Vec<usize> = (0..bank.len()).filter(|i| !asked.contains(i)).collect();

    let index = if available.is_empty() {
        rng.gen_range(0..bank.len())
    } else {
        available[rng.gen_range(0..available.len())]
    };

    (bank[index].clone(), index)
}
