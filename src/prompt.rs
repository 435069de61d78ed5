//! Overwrite confirmation.

use std::path::Path;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::sync::Mutex;

use crate::error::{IoResultExt, ScaffoldResult};

/// Asked before a dedicated artifact replaces an existing file or directory.
#[async_trait]
pub trait OverwritePrompt: Send + Sync {
    async fn confirm_overwrite(&self, path: &Path) -> ScaffoldResult<bool>;
}

/// Always overwrites.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

#[async_trait]
impl OverwritePrompt for AssumeYes {
    async fn confirm_overwrite(&self, _path: &Path) -> ScaffoldResult<bool> {
        Ok(true)
    }
}

/// Never overwrites; used for non-interactive runs without `--force`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeNo;

#[async_trait]
impl OverwritePrompt for AssumeNo {
    async fn confirm_overwrite(&self, _path: &Path) -> ScaffoldResult<bool> {
        Ok(false)
    }
}

type AnswerLines = Lines<BufReader<Box<dyn AsyncRead + Send + Unpin>>>;

struct Console {
    answers: AnswerLines,
    questions: Box<dyn AsyncWrite + Send + Unpin>,
}

/// Asks `Overwrite <path>? [y/N]` on stderr and reads the answer from stdin.
/// Anything other than `y` or `yes` declines, including end of input.
///
/// One buffered reader serves every question of a run, so piped answers
/// that arrive in a single read are consumed line by line.
pub struct StdinPrompt {
    console: Mutex<Console>,
}

impl StdinPrompt {
    pub fn new() -> Self {
        Self::with_io(tokio::io::stdin(), tokio::io::stderr())
    }

    /// Reads answers from `answers` and writes questions to `questions`.
    pub fn with_io(
        answers: impl AsyncRead + Send + Unpin + 'static,
        questions: impl AsyncWrite + Send + Unpin + 'static,
    ) -> Self {
        let answers: Box<dyn AsyncRead + Send + Unpin> = Box::new(answers);
        Self {
            console: Mutex::new(Console {
                answers: BufReader::new(answers).lines(),
                questions: Box::new(questions),
            }),
        }
    }
}

impl Default for StdinPrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OverwritePrompt for StdinPrompt {
    async fn confirm_overwrite(&self, path: &Path) -> ScaffoldResult<bool> {
        let mut console = self.console.lock().await;
        let question = format!("Overwrite {}? [y/N] ", path.display());
        console.questions.write_all(question.as_bytes()).await.at(path)?;
        console.questions.flush().await.at(path)?;

        let answer = console.answers.next_line().await.at(path)?;
        Ok(answer.as_deref().is_some_and(is_affirmative))
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_answers() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES \n"));
        assert!(!is_affirmative("\n"));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative(""));
    }

    #[tokio::test]
    async fn test_fixed_answers() {
        let path = Path::new("app/Models/Order.php");
        assert!(AssumeYes.confirm_overwrite(path).await.unwrap());
        assert!(!AssumeNo.confirm_overwrite(path).await.unwrap());
    }

    #[tokio::test]
    async fn test_piped_answers_are_read_one_per_question() {
        let prompt = StdinPrompt::with_io(&b"y\nyes\nn\n"[..], tokio::io::sink());
        let model = Path::new("app/Models/Order.php");
        let service = Path::new("app/Services/OrderService.php");

        assert!(prompt.confirm_overwrite(model).await.unwrap());
        assert!(prompt.confirm_overwrite(service).await.unwrap());
        assert!(!prompt.confirm_overwrite(model).await.unwrap());
        // End of input declines.
        assert!(!prompt.confirm_overwrite(service).await.unwrap());
    }
}
