use crate::ai::ModelChoice;

pub fn run() {
    for model in ModelChoice::ALL {
        let marker = if model == ModelChoice::default() { " (default)" } else { "" };
        println!("{}{}", model, marker);
    }
}
