//! Tests for the signal-aware cancellation context.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use super::*;

const WAIT: Duration = Duration::from_secs(5);

/// Creates a context driven by a channel instead of OS signals.
fn channel_context(parent: &CancellationToken) -> (SignalContext, mpsc::Sender<Signal>) {
    let (tx, mut rx) = mpsc::channel(2);
    let ctx = SignalContext::with_source(parent, async move { rx.recv().await });
    (ctx, tx)
}

async fn wait_cancelled(ctx: &SignalContext) {
    tokio::time::timeout(WAIT, ctx.cancelled())
        .await
        .expect("context was not cancelled");
}

mod signal_names {
    use super::*;

    #[test]
    fn interrupt_is_sigint() {
        assert_eq!(Signal::Interrupt.to_string(), "SIGINT");
    }

    #[test]
    fn terminate_is_sigterm() {
        assert_eq!(Signal::Terminate.to_string(), "SIGTERM");
    }
}

mod transitions {
    use super::*;

    #[tokio::test]
    async fn starts_active() {
        let parent = CancellationToken::new();
        let (ctx, _tx) = channel_context(&parent);

        assert_eq!(ctx.state(), State::Active);
        assert!(!ctx.is_cancelled());
        assert_eq!(ctx.cause(), None);
    }

    #[tokio::test]
    async fn interrupt_cancels_context() {
        let parent = CancellationToken::new();
        let (ctx, tx) = channel_context(&parent);

        tx.send(Signal::Interrupt).await.unwrap();
        wait_cancelled(&ctx).await;

        assert_eq!(ctx.state(), State::Cancelled);
        assert_eq!(ctx.cause(), Some(Cause::Signal(Signal::Interrupt)));
    }

    #[tokio::test]
    async fn terminate_cancels_context() {
        let parent = CancellationToken::new();
        let (ctx, tx) = channel_context(&parent);

        tx.send(Signal::Terminate).await.unwrap();
        wait_cancelled(&ctx).await;

        assert_eq!(ctx.cause(), Some(Cause::Signal(Signal::Terminate)));
    }

    #[tokio::test]
    async fn signal_does_not_cancel_parent() {
        let parent = CancellationToken::new();
        let (ctx, tx) = channel_context(&parent);

        tx.send(Signal::Interrupt).await.unwrap();
        wait_cancelled(&ctx).await;

        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn parent_cancellation_propagates() {
        let parent = CancellationToken::new();
        let (ctx, _tx) = channel_context(&parent);

        parent.cancel();
        wait_cancelled(&ctx).await;

        assert_eq!(ctx.cause(), Some(Cause::Parent));
    }

    #[tokio::test]
    async fn owner_cancel_records_parent_cause() {
        let parent = CancellationToken::new();
        let (ctx, _tx) = channel_context(&parent);

        ctx.cancel();

        assert_eq!(ctx.state(), State::Cancelled);
        assert_eq!(ctx.cause(), Some(Cause::Parent));
    }

    #[tokio::test]
    async fn cloned_token_observes_cancellation() {
        let parent = CancellationToken::new();
        let (ctx, tx) = channel_context(&parent);
        let token = ctx.token();

        tx.send(Signal::Interrupt).await.unwrap();
        tokio::time::timeout(WAIT, token.cancelled()).await.unwrap();

        assert!(token.is_cancelled());
    }
}

mod single_shot {
    use super::*;

    #[tokio::test]
    async fn second_signal_has_no_effect() {
        let parent = CancellationToken::new();
        let (ctx, tx) = channel_context(&parent);

        tx.send(Signal::Interrupt).await.unwrap();
        wait_cancelled(&ctx).await;
        ctx.close().await;

        // The listener consumed one signal and dropped its receiver.
        assert!(tx.send(Signal::Terminate).await.is_err());
    }

    #[tokio::test]
    async fn cause_is_fixed_by_first_event() {
        let parent = CancellationToken::new();
        let (ctx, tx) = channel_context(&parent);

        tx.send(Signal::Terminate).await.unwrap();
        wait_cancelled(&ctx).await;
        parent.cancel();
        ctx.cancel();

        assert_eq!(ctx.cause(), Some(Cause::Signal(Signal::Terminate)));
    }

    #[tokio::test]
    async fn closed_source_keeps_context_active() {
        let parent = CancellationToken::new();
        let ctx = SignalContext::with_source(&parent, async { None });

        tokio::task::yield_now().await;
        assert_eq!(ctx.state(), State::Active);

        parent.cancel();
        wait_cancelled(&ctx).await;
        assert_eq!(ctx.cause(), Some(Cause::Parent));
    }

    #[tokio::test]
    async fn dropped_sender_keeps_context_active() {
        let parent = CancellationToken::new();
        let (tx, rx) = oneshot::channel::<Signal>();
        let ctx = SignalContext::with_source(&parent, async move { rx.await.ok() });

        drop(tx);
        tokio::task::yield_now().await;

        assert!(!ctx.is_cancelled());
        ctx.close().await;
    }
}

mod os_registration {
    use super::*;

    #[tokio::test]
    async fn registers_handlers_inside_runtime() {
        let parent = CancellationToken::new();
        let ctx = SignalContext::with_signals(&parent).unwrap();

        assert_eq!(ctx.state(), State::Active);
        ctx.close().await;
    }
}
