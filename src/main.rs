use std::path::PathBuf;
use std::process;

use clap::Parser;
use mcquiz::Quiz;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file to load the questions from
    #[arg(short, long)]
    questions: PathBuf,

    /// Opaque quiz identifier forwarded in the submission payload
    #[arg(long)]
    quiz_id: Option<String>,

    /// Backend endpoint that receives completed attempts
    #[arg(long)]
    submit_url: Option<String>,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut quiz = match Quiz::from_json(&args.questions) {
        Ok(quiz) => quiz,
        Err(e) => {
            eprintln!("Failed to load questions: {}", e);
            process::exit(1);
        }
    };
    if let Some(quiz_id) = args.quiz_id {
        quiz = quiz.quiz_id(quiz_id);
    }
    if let Some(url) = args.submit_url {
        quiz = quiz.submit_url(url);
    }

    if let Err(e) = quiz.run().await {
        eprintln!("Error running quiz: {}", e);
        process::exit(1);
    }
}
