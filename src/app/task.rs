// SPDX-License-Identifier: GPL-3.0-only

//! Deferred work produced by message handlers
//!
//! A handler mutates state synchronously and may hand back a [`Task`]: one or
//! more futures that each resolve to a follow-up [`Message`]. Whoever drives
//! the model awaits them and feeds the results back through
//! [`AppModel::update`](super::AppModel::update). Nothing can cancel a task
//! once it has been returned.

use super::Message;
use futures::future::{BoxFuture, FutureExt, join_all};
use std::future::Future;
use std::time::Duration;

/// Pending asynchronous follow-ups
#[must_use = "tasks do nothing unless awaited"]
#[derive(Default)]
pub struct Task {
    futures: Vec<BoxFuture<'static, Message>>,
}

impl Task {
    /// No follow-up work
    pub fn none() -> Self {
        Self::default()
    }

    /// Run a future and map its output to a message
    pub fn perform<F, T, M>(future: F, map: M) -> Self
    where
        F: Future<Output = T> + Send + 'static,
        M: FnOnce(T) -> Message + Send + 'static,
    {
        Self {
            futures: vec![future.map(map).boxed()],
        }
    }

    /// Emit a message after a delay
    pub fn delay(millis: u64, message: Message) -> Self {
        Self::perform(
            async move { tokio::time::sleep(Duration::from_millis(millis)).await },
            move |()| message,
        )
    }

    /// Combine several tasks
    pub fn batch(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self {
            futures: tasks.into_iter().flat_map(|t| t.futures).collect(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.futures.is_empty()
    }

    /// Number of pending futures
    pub fn len(&self) -> usize {
        self.futures.len()
    }

    /// Await every future; messages come back in the order the futures were added
    pub async fn resolve(self) -> Vec<Message> {
        join_all(self.futures).await
    }

    pub(crate) fn into_futures(self) -> Vec<BoxFuture<'static, Message>> {
        self.futures
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("pending", &self.futures.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_perform_maps_output() {
        let task = Task::perform(async { 3 }, |n| Message::SetZoom(n as f32));
        let messages = task.resolve().await;
        assert!(matches!(messages.as_slice(), [Message::SetZoom(z)] if *z == 3.0));
    }

    #[tokio::test]
    async fn test_batch_and_none() {
        assert!(Task::none().is_none());
        let task = Task::batch([Task::none(), Task::delay(1, Message::ToggleFlash)]);
        assert_eq!(task.len(), 1);
        assert_eq!(task.resolve().await.len(), 1);
    }
}
