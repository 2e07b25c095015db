//! Synthesis prompt construction.
//!
//! Pure and deterministic: the same query and article set always produce a
//! byte-identical prompt. The template asks for six fixed sections and
//! instructs the model to attribute each outcome to a PMID and URL;
//! whether the model actually cites correctly is not checked here or
//! anywhere downstream.

use crate::models::NormalizedAbstract;

/// Publication-year window named in the instruction template.
pub const YEAR_WINDOW: &str = "2021-2023";

/// Instruction template with `{query}`, `{years}` and `{article_list}`
/// placeholders.
const PROMPT_TEMPLATE: &str = "Using your expert knowledge, analyze the following systematic reviews related to '{query}' published between {years}:
{article_list}

Please provide a structured analysis with the following sections:

1. Summary of Findings:
- Provide a brief summary of the main findings of these articles.

2. Important Outcomes (with PMID and URL):
- List the most important outcomes in bullet points and ensure that the PMID and URL mentioned for each outcome correspond to the correct article.

3. Comparisons and Contrasts:
- Highlight any key differences or similarities between the findings of these articles.

4. Innovative Treatments or Methodologies:
- Are there any innovative treatments or methodologies mentioned in these articles that could have significant impact on the field?

5. Future Research and Unanswered Questions:
- Briefly discuss any potential future research directions or unanswered questions based on the findings of these articles.

6. Conclusion:
- Sum up the main takeaways from these articles.";

/// Builds the synthesis prompt for a query and its normalized abstracts.
///
/// One `PMID: <id> URL: <url>` line is rendered per article, in the order
/// the articles were returned by the search stage.
#[must_use]
pub fn build_prompt(query: &str, items: &[NormalizedAbstract]) -> String {
    let article_list = items
        .iter()
        .map(|item| format!("PMID: {} URL: {}", item.id, item.url))
        .collect::<Vec<_>>()
        .join("\n");

    PROMPT_TEMPLATE
        .replace("{query}", query)
        .replace("{years}", YEAR_WINDOW)
        .replace("{article_list}", &article_list)
}
