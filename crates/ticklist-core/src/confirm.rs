/// A destructive operation waiting on the user's go-ahead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmRequest {
    DeleteTodo { text: String },
    ClearCompleted { count: usize },
    ClearAll { count: usize },
    ReplaceAll { existing: usize, incoming: usize },
}

impl ConfirmRequest {
    /// Question to put in front of the user.
    pub fn prompt(&self) -> String {
        match self {
            ConfirmRequest::DeleteTodo { text } => {
                format!("Are you sure you want to delete \"{text}\"?")
            }
            ConfirmRequest::ClearCompleted { count } => {
                format!("Are you sure you want to delete {count} completed todo(s)?")
            }
            ConfirmRequest::ClearAll { count } => format!(
                "Are you sure you want to delete ALL {count} todo(s)? This action cannot be undone."
            ),
            ConfirmRequest::ReplaceAll { existing, incoming } => format!(
                "This will replace all {existing} existing todo(s) with {incoming} imported. Continue?"
            ),
        }
    }
}

/// Decides whether a destructive operation may proceed.
///
/// Any `FnMut(&ConfirmRequest) -> bool` closure works, so tests can pass `|_| true`.
pub trait Confirmer {
    fn confirm(&mut self, request: &ConfirmRequest) -> bool;
}

impl<F> Confirmer for F
where
    F: FnMut(&ConfirmRequest) -> bool,
{
    fn confirm(&mut self, request: &ConfirmRequest) -> bool {
        self(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_act_as_confirmers() {
        let mut seen = Vec::new();
        let mut confirmer = |req: &ConfirmRequest| {
            seen.push(req.clone());
            false
        };
        assert!(!confirmer.confirm(&ConfirmRequest::ClearAll { count: 3 }));
        assert_eq!(seen, vec![ConfirmRequest::ClearAll { count: 3 }]);
    }

    #[test]
    fn prompts_mention_counts() {
        let prompt = ConfirmRequest::ClearCompleted { count: 2 }.prompt();
        assert_eq!(
            prompt,
            "Are you sure you want to delete 2 completed todo(s)?"
        );
    }
}
