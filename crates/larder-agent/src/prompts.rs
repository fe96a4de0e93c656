use larder_core::types::RankedResult;

pub fn build_search_action_prompt(user_request: &str) -> String {
    format!(
        "You are a helpful cooking assistant.\n\
         Given the user's request, produce a short search query string.\n\
         Only output the search query.\n\n\
         User request: {user_request}\n\
         Search query:"
    )
}

pub fn build_final_answer_prompt(user_request: &str, retrieved: &[RankedResult]) -> String {
    let context = retrieved
        .iter()
        .map(|r| format!("- {} (score={:.3}): {}", r.meta.title, r.score, r.document))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "You are an AI cooking agent for college students.\n\
         You must recommend 1-2 recipes that best match the user's constraints.\n\
         Use ONLY the recipes in the context below.\n\
         Explain briefly why each choice fits budget/time/dietary constraints.\n\n\
         User request: {user_request}\n\n\
         Context recipes:\n{context}\n\n\
         Answer:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::types::RecipeMeta;

    #[test]
    fn search_prompt_ends_with_cue() {
        let p = build_search_action_prompt("vegan dinner");
        assert!(p.contains("User request: vegan dinner\n"));
        assert!(p.ends_with("Search query:"));
    }

    #[test]
    fn answer_prompt_renders_each_result() {
        let hit = RankedResult {
            meta: RecipeMeta { id: "r1".into(), title: "Vegan Stir Fry".into() },
            score: 0.81234,
            document: "Vegan Stir Fry. Tags: vegan.".into(),
        };
        let p = build_final_answer_prompt("vegan dinner", &[hit]);
        assert!(p.contains("Context recipes:\n- Vegan Stir Fry (score=0.812): Vegan Stir Fry. Tags: vegan.\n\nAnswer:"));
    }

    #[test]
    fn answer_prompt_with_no_results_has_empty_context() {
        let p = build_final_answer_prompt("x", &[]);
        assert!(p.contains("Context recipes:\n\n\nAnswer:"));
    }
}
