// src/core/prompt.rs — Prompt templates for the solver and reviewer

use crate::core::types::GenerationContext;

/// Build the solver prompt: revision template when a prior solution and
/// feedback are both present, fresh generation otherwise.
pub fn solver_prompt(ctx: &GenerationContext) -> String {
    if ctx.is_revision() {
        format!(
            "You previously wrote a solution to this problem.\n\n\
             ## Problem\n{}\n\n\
             ## Your previous solution\n{}\n\n\
             ## Reviewer feedback\n{}\n\n\
             Revise the solution to address the feedback. \
             Respond with the improved code only.",
            ctx.problem, ctx.previous_solution, ctx.previous_feedback
        )
    } else {
        format!(
            "Solve the following programming problem.\n\n\
             ## Problem\n{}\n\n\
             Respond with working code only.",
            ctx.problem
        )
    }
}

/// Build the reviewer prompt. The instructions pin the `Score: X/10` line
/// the extractor looks for.
pub fn review_prompt(problem: &str, solution: &str, round: u8) -> String {
    format!(
        "You are reviewing a candidate solution (round {}).\n\n\
         ## Problem\n{}\n\n\
         ## Solution\n{}\n\n\
         Critique the solution briefly: correctness first, then robustness \
         and clarity.\n\
         End your review with a line in exactly this format:\n\
         Score: X/10",
        round, problem, solution
    )
}

/// Feedback summary carried into the next round's generation context.
pub fn feedback_summary(score: u8) -> String {
    format!(
        "The previous solution scored {}/10. Address the weakest areas: \
         correctness first, then robustness and clarity.",
        score
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_prompt_has_no_revision_sections() {
        let ctx = GenerationContext::fresh("reverse a string");
        let p = solver_prompt(&ctx);
        assert!(p.contains("reverse a string"));
        assert!(!p.contains("previous solution"));
    }

    #[test]
    fn test_revision_prompt_embeds_carryover() {
        let ctx = GenerationContext::revision("p", "function f() {}", "too slow");
        let p = solver_prompt(&ctx);
        assert!(p.contains("function f() {}"));
        assert!(p.contains("too slow"));
        assert!(p.contains("Revise the solution"));
    }

    #[test]
    fn test_partial_carryover_falls_back_to_fresh() {
        let ctx = GenerationContext::revision("p", "code", "");
        assert!(!solver_prompt(&ctx).contains("Revise"));
    }

    #[test]
    fn test_review_prompt_shape() {
        let p = review_prompt("reverse a string", "function f() {}", 3);
        assert!(p.contains("round 3"));
        assert!(p.contains("reverse a string"));
        assert!(p.contains("function f() {}"));
        assert!(p.contains("Score: X/10"));
    }

    #[test]
    fn test_feedback_summary_embeds_score() {
        assert!(feedback_summary(6).contains("6/10"));
    }
}
