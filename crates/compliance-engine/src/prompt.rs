//! Prompt template for compliance checks

use compliance_types::FINDING_FIELDS;

/// What the model should put in each finding field, in [`FINDING_FIELDS`] order.
const FIELD_DESCRIPTIONS: [&str; 5] = [
    "the section of the webpage where the violation occurs",
    "the exact text that violates the policy",
    "the section of the policy that is violated",
    "the specific part of the policy that is violated",
    "a detailed suggestion on how to make the text compliant, including alternative phrasing or actions to take",
];

/// Build the compliance prompt. Both texts are embedded verbatim.
pub fn build_prompt(policy_text: &str, webpage_text: &str) -> String {
    let fields = FINDING_FIELDS
        .iter()
        .zip(FIELD_DESCRIPTIONS)
        .map(|(name, description)| format!("- \"{}\": {}", name, description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a strict compliance checker. Here is the compliance policy, divided into sections:\n\
         \n\
         {policy}\n\
         \n\
         And here is the main content of the webpage, also divided into sections:\n\
         \n\
         {webpage}\n\
         \n\
         Carefully analyze the webpage content against the policy. For each violation, provide a JSON object with exactly these fields:\n\
         {fields}\n\
         \n\
         Return a JSON array of such objects. If there are no violations, return an empty array.\n\
         \n\
         Ensure the output is a valid JSON array without any additional text.\n",
        policy = policy_text,
        webpage = webpage_text,
        fields = fields,
    )
}
