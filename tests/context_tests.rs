mod fixtures;

use logctx::{Context, ContextKey, Field, Level, Logger, TRACE_ID};

#[cfg(test)]
mod tests {
    use super::*;

    struct RequestPath;

    impl ContextKey for RequestPath {
        type Value = String;
    }

    struct Attempt;

    impl ContextKey for Attempt {
        type Value = u32;
    }

    // ==================== from() tests ====================

    #[test]
    fn test_from_without_logger_returns_default_logger() {
        let logger = logctx::from(&Context::background());

        assert!(logger.enabled(Level::Info));
        assert!(logger.fields().is_empty());
    }

    #[test]
    fn test_from_returns_bound_logger() {
        let logger = Logger::nop();
        let ctx = logctx::bind(&Context::background(), logger.clone());

        assert_eq!(logctx::from(&ctx), logger);
    }

    #[test]
    fn test_from_ignores_unrelated_values() {
        let ctx = Context::background().with_value::<RequestPath>("/users".to_string());

        assert!(ctx.logger().is_none());
        assert!(logctx::from(&ctx).enabled(Level::Error));
    }

    // ==================== bind() tests ====================

    #[test]
    fn test_bind_leaves_parent_untouched() {
        let parent = Context::background().with_value::<Attempt>(1);
        let child = logctx::bind(&parent, Logger::nop());

        assert!(parent.logger().is_none());
        assert!(child.logger().is_some());
        assert_eq!(child.value::<Attempt>(), Some(&1));
    }

    #[test]
    fn test_nearest_binding_wins() {
        let outer = Logger::nop();
        let inner = Logger::nop();
        let ctx = logctx::bind(&logctx::bind(&Context::background(), outer.clone()), inner.clone());

        assert_eq!(logctx::from(&ctx), inner);
        assert_ne!(logctx::from(&ctx), outer);
    }

    // ==================== with_fields() tests ====================

    #[test]
    fn test_with_fields_without_fields_returns_same_context() {
        let ctx = Context::background().with_value::<Attempt>(3);
        let derived = logctx::with_fields(&ctx, Vec::<Field>::new());

        assert!(Context::ptr_eq(&ctx, &derived));
    }

    #[test]
    fn test_with_fields_adds_fields_to_bound_logger() {
        let logger = Logger::nop();
        let ctx = logctx::with_fields(
            &logctx::bind(&Context::background(), logger.clone()),
            [Field::string("key", "value")],
        );

        assert_eq!(
            logctx::from(&ctx),
            logger.with([Field::string("key", "value")])
        );
    }

    #[test]
    fn test_with_fields_accumulates_across_derivations() {
        let logger = Logger::nop();
        let base = logctx::bind(&Context::background(), logger.clone());
        let first = logctx::with_fields(&base, [Field::int("attempt", 1)]);
        let second = logctx::with_fields(&first, [Field::bool("retry", true)]);

        assert_eq!(
            logctx::from(&second),
            logger.with([Field::int("attempt", 1), Field::bool("retry", true)])
        );
        assert_eq!(logctx::from(&first), logger.with([Field::int("attempt", 1)]));
        assert_eq!(logctx::from(&base), logger);
    }

    #[test]
    fn test_with_fields_on_empty_context_binds_enriched_default() {
        let ctx = logctx::with_fields(&Context::background(), [Field::string("svc", "billing")]);

        let logger = ctx.logger().expect("logger should be bound");
        assert_eq!(logger.fields(), &[Field::string("svc", "billing")]);
    }

    // ==================== with_trace_id() tests ====================

    #[test]
    fn test_with_trace_id_uses_reserved_field_name() {
        let logger = Logger::nop();
        let ctx = logctx::with_trace_id(
            &logctx::bind(&Context::background(), logger.clone()),
            "a-trace-id",
        );

        assert_eq!(TRACE_ID, "trace_id");
        assert_eq!(
            logctx::from(&ctx),
            logger.with([Field::string(TRACE_ID, "a-trace-id")])
        );
    }

    // ==================== value() tests ====================

    #[test]
    fn test_values_are_typed_by_key() {
        let ctx = Context::background()
            .with_value::<RequestPath>("/orders".to_string())
            .with_value::<Attempt>(2);

        assert_eq!(ctx.value::<RequestPath>().map(String::as_str), Some("/orders"));
        assert_eq!(ctx.value::<Attempt>(), Some(&2));
        assert_eq!(ctx.depth(), 2);
    }

    #[test]
    fn test_later_value_shadows_earlier() {
        let ctx = Context::background()
            .with_value::<Attempt>(1)
            .with_value::<Attempt>(2);

        assert_eq!(ctx.value::<Attempt>(), Some(&2));
    }

    #[test]
    fn test_missing_value_returns_none() {
        assert!(Context::background().value::<Attempt>().is_none());
    }

    #[test]
    fn test_concurrent_derivation_from_shared_parent() {
        let logger = Logger::nop();
        let parent = logctx::bind(&Context::background(), logger.clone());

        std::thread::scope(|scope| {
            for i in 0..8 {
                let parent = &parent;
                let logger = &logger;
                scope.spawn(move || {
                    let id = format!("trace-{}", i);
                    let child = logctx::with_trace_id(parent, id.clone());
                    assert_eq!(logctx::from(&child), logger.with([Field::trace_id(id)]));
                });
            }
        });

        assert_eq!(logctx::from(&parent), logger);
    }

    // ==================== scope tests ====================

    #[test]
    fn test_current_outside_scope_is_background() {
        let current = Context::current();

        assert_eq!(current.depth(), 0);
        assert!(current.logger().is_none());
    }

    #[test]
    fn test_sync_scope_installs_context() {
        let ctx = Context::background().with_value::<Attempt>(7);

        let seen = ctx.sync_scope(|| Context::current().value::<Attempt>().copied());

        assert_eq!(seen, Some(7));
        assert!(Context::current().value::<Attempt>().is_none());
    }

    #[tokio::test]
    async fn test_scope_follows_the_task_across_awaits() {
        let logger = Logger::nop();
        let ctx = logctx::with_trace_id(&logctx::bind(&Context::background(), logger.clone()), "req-1");

        let resolved = ctx
            .scope(async {
                tokio::task::yield_now().await;
                logctx::from(&Context::current())
            })
            .await;

        assert_eq!(resolved, logger.with([Field::trace_id("req-1")]));
    }
}
