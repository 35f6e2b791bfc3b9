use serde_json::{Map, Value};

use super::response_parser::truncate_chars;

pub const DEFAULT_EXTRACTION_GOAL: &str =
    "Extract key information from the document including contact details, important dates, and main topics";

const DOCUMENT_TRUNCATION_MARKER: &str = "\n\n[Document truncated due to length...]";

/// Built-in extraction templates: template name to extraction goal.
pub static TEMPLATE_CATALOG: &[(&str, &str)] = &[
    (
        "emails",
        "Extract email addresses, subjects, and sender information",
    ),
    (
        "contacts",
        "Extract contact information including names, phone numbers, and addresses",
    ),
    (
        "invoices",
        "Extract invoice details including amounts, dates, and vendor information",
    ),
    (
        "resumes",
        "Extract candidate information, skills, and experience",
    ),
    (
        "contracts",
        "Extract key contract terms, dates, and parties involved",
    ),
    (
        "medical",
        "Extract medical information, diagnoses, and treatment details",
    ),
    (
        "financial",
        "Extract financial data, transactions, and account information",
    ),
];

/// Field sets per template: field name to its description. Every field is an
/// array-of-strings in the output contract.
static TEMPLATE_FIELDS: &[(&str, &[(&str, &str)])] = &[
    (
        "emails",
        &[
            ("emails", "Email addresses found in the document"),
            ("subjects", "Email subjects or message titles"),
            ("senders", "Names or addresses of email senders"),
            ("dates", "Email dates or timestamps"),
        ],
    ),
    (
        "contacts",
        &[
            ("names", "Full names of people or organizations"),
            ("phone_numbers", "Phone numbers in any format"),
            ("email_addresses", "Email addresses"),
            ("addresses", "Physical addresses"),
            ("companies", "Company or organization names"),
        ],
    ),
    (
        "invoices",
        &[
            ("invoice_numbers", "Invoice or bill numbers"),
            ("amounts", "Monetary amounts and totals"),
            ("dates", "Invoice dates, due dates, or payment dates"),
            ("vendors", "Vendor or supplier names"),
            ("items", "Products or services listed"),
        ],
    ),
    (
        "resumes",
        &[
            ("names", "Candidate names"),
            ("skills", "Technical and professional skills"),
            ("experience", "Work experience and job titles"),
            ("education", "Educational background and degrees"),
            ("contact_info", "Phone numbers and email addresses"),
        ],
    ),
    (
        "contracts",
        &[
            ("parties", "Names of contracting parties"),
            ("terms", "Key contract terms and conditions"),
            ("dates", "Contract dates, deadlines, and durations"),
            ("amounts", "Financial terms and amounts"),
            ("obligations", "Key obligations and responsibilities"),
        ],
    ),
    (
        "medical",
        &[
            ("patient_info", "Patient names and identifiers"),
            ("diagnoses", "Medical diagnoses and conditions"),
            ("treatments", "Treatments and procedures"),
            ("medications", "Prescribed medications"),
            ("dates", "Medical dates and appointments"),
        ],
    ),
    (
        "financial",
        &[
            ("accounts", "Account numbers and types"),
            ("transactions", "Transaction descriptions and amounts"),
            ("dates", "Transaction dates and periods"),
            ("balances", "Account balances and totals"),
            ("institutions", "Financial institution names"),
        ],
    ),
];

/// Generic field set used when no template is recognized.
static DYNAMIC_FIELDS: &[(&str, &str)] = &[
    ("key_information", "Main topics and important information"),
    ("names", "Names of people, organizations, or entities"),
    ("dates", "Important dates and timestamps"),
    ("numbers", "Important numbers, amounts, or quantities"),
    ("contacts", "Contact information like emails and phones"),
];

pub fn is_known_template(template: &str) -> bool {
    TEMPLATE_CATALOG.iter().any(|(name, _)| *name == template)
}

pub fn template_goal(template: &str) -> Option<&'static str> {
    TEMPLATE_CATALOG
        .iter()
        .find(|(name, _)| *name == template)
        .map(|(_, goal)| *goal)
}

fn fields_for_template(template: Option<&str>) -> &'static [(&'static str, &'static str)] {
    template
        .and_then(|name| {
            TEMPLATE_FIELDS
                .iter()
                .find(|(template_name, _)| *template_name == name)
                .map(|(_, fields)| *fields)
        })
        .unwrap_or(DYNAMIC_FIELDS)
}

/// System prompt for single-stage template/custom extraction: enumerates the
/// required output fields, each an array of strings.
pub fn build_extraction_system_prompt(extraction_goal: &str, template: Option<&str>) -> String {
    let fields = fields_for_template(template);

    let mut field_examples = Map::new();
    let mut field_definitions = Map::new();
    for (name, description) in fields {
        field_examples.insert(name.to_string(), Value::Array(Vec::new()));
        field_definitions.insert(name.to_string(), Value::String(description.to_string()));
    }

    let examples_json = serde_json::to_string_pretty(&Value::Object(field_examples))
        .unwrap_or_else(|_| "{}".to_string());
    let definitions_json = serde_json::to_string_pretty(&Value::Object(field_definitions))
        .unwrap_or_else(|_| "{}".to_string());

    format!(
        r#"You are a precise document analysis and extraction expert. Your task is to analyze the document and extract specific information according to the requirements.

EXTRACTION GOAL: {extraction_goal}

REQUIRED OUTPUT FORMAT - Return ONLY valid JSON with this exact structure:
{examples_json}

CRITICAL RULES:
1. Return ONLY valid JSON - no explanatory text, no markdown, no code blocks
2. Each field must be an array of strings
3. If no data found for a field, return an empty array: []
4. Extract exact text from the document when possible
5. Do not hallucinate or infer information not present in the document
6. Be precise and conservative in extraction
7. If multiple similar items exist, include all of them

FIELD DEFINITIONS:
{definitions_json}"#
    )
}

/// User prompt embedding the (possibly truncated) document text.
pub fn build_extraction_user_prompt(
    document_text: &str,
    extraction_goal: &str,
    template: Option<&str>,
    max_document_chars: usize,
) -> String {
    let embedded = embed_document_text(document_text, max_document_chars);

    let mut prompt = format!(
        r#"DOCUMENT CONTENT:
{embedded}

EXTRACTION TASK: {extraction_goal}

Analyze the above document and extract the requested information. Return the results in the exact JSON format specified in the system prompt."#
    );

    if let Some(name) = template {
        prompt.push_str(&format!("\n\nTemplate: {name}"));
    }

    prompt
}

/// System prompt for dynamic-query extraction: the model designs the schema
/// from the query intent.
pub fn build_dynamic_system_prompt(use_summarization: bool, enable_citations: bool) -> String {
    let mut prompt = String::from(
        r#"You are an advanced document analysis AI that creates dynamic data structures based on natural language queries.

Your task is to:
1. Analyze the user's natural language query to understand what they want to extract
2. Design an appropriate data structure (schema) that best represents the requested information
3. Extract the relevant data from the document using that dynamic structure

CRITICAL RULES FOR DYNAMIC SCHEMA GENERATION:

1. VARIABLE NAMES: Determine appropriate variable names based on the query intent
   - "teams who lost" -> "teams" array with team objects
   - "product prices" -> "products" array with price information
   - "customer complaints" -> "complaints" array with complaint details

2. VARIABLE TYPES: Choose the most appropriate data structure
   - Single entities: Use objects with properties
   - Multiple entities: Use arrays of objects
   - Simple lists: Use arrays of strings/numbers
   - Complex relationships: Use nested objects

3. PROPERTY NAMES: Create meaningful property names within objects
   - For teams: "name", "status", "score", "result"
   - For products: "name", "price", "category", "description"
   - For people: "name", "role", "department", "contact"

4. DATA EXTRACTION: Extract only information that exists in the document
   - Do not hallucinate or infer missing data
   - Use "unknown" or null for missing required fields
   - Be precise and factual

5. STRUCTURE CONSISTENCY: Maintain consistent structure across similar entities
   - All team objects should have the same properties
   - All product objects should follow the same schema"#,
    );

    if use_summarization {
        prompt.push_str(
            r#"

SUMMARIZATION MODE ACTIVE:
- For long text content, provide BRIEF SUMMARIES instead of full text
- Focus on key points, main ideas, and essential information
- Keep summaries concise but informative
- Maintain factual accuracy while reducing length"#,
        );
    }

    if enable_citations {
        prompt.push_str(
            r#"

CITATION MODE ACTIVE:
- Include "page_reference" or "source_page" in objects when available
- Use page markers [PAGE X] to identify source pages
- Add citation information like: {"text": "summary", "page": 2}
- Preserve page reference information for traceability"#,
        );
    }

    prompt.push_str(
        r#"

EXAMPLE TRANSFORMATIONS:
Query: "Extract teams and their scores"
Schema: {"teams": [{"name": "string", "score": "number", "status": "string"}]}

Query: "Get customer feedback and ratings"
Schema: {"feedback": [{"customer": "string", "comment": "string", "rating": "number", "date": "string"}]}

Query: "Find all financial transactions"
Schema: {"transactions": [{"amount": "number", "type": "string", "date": "string", "description": "string"}]}

RESPONSE FORMAT: Return ONLY valid JSON with the dynamic structure you determine is most appropriate for the query."#,
    );

    prompt
}

pub fn build_dynamic_user_prompt(
    document_text: &str,
    natural_query: &str,
    use_summarization: bool,
    enable_citations: bool,
    max_document_chars: usize,
) -> String {
    let embedded = embed_document_text(document_text, max_document_chars);

    let mut prompt = format!(
        r#"DOCUMENT CONTENT:
{embedded}

USER QUERY: {natural_query}

Analyze the document and extract the information requested in the query. Design an appropriate data structure that best represents what the user is asking for, then extract the relevant data.

Remember:
- Create variable names and types that match the user's intent
- Use the most logical structure for the requested information
- Extract only factual data from the document"#
    );

    if use_summarization {
        prompt.push_str(
            r#"
- For long text content, provide brief summaries with key points
- Focus on essential information rather than full text reproduction
- Keep extracted content concise but informative"#,
        );
    }

    if enable_citations {
        prompt.push_str(
            r#"
- Include page references when available (look for [PAGE X] markers)
- Add "page" or "source_page" fields to track information sources
- Maintain traceability of where information was found"#,
        );
    }

    prompt.push_str("\n\nReturn the result as valid JSON");
    prompt
}

/// Document-free intent analysis prompt, used to preview the schema a query
/// would likely produce.
pub fn build_intent_analysis_prompt(natural_query: &str) -> String {
    format!(
        r#"Analyze this natural language query and determine what data structure would be most appropriate:

QUERY: {natural_query}

Return a JSON object describing:
1. The main entities the user wants to extract
2. The suggested variable names
3. The expected data types
4. The suggested structure
5. Whether summarization would be beneficial
6. Whether citations would be helpful

Example response:
{{
  "main_entities": ["teams", "scores"],
  "suggested_variables": {{"teams": "array", "scores": "number"}},
  "structure_type": "array_of_objects",
  "explanation": "User wants to extract multiple teams with their associated scores",
  "summarization_recommended": false,
  "citations_recommended": true
}}"#
    )
}

pub const INTENT_ANALYSIS_SYSTEM_PROMPT: &str =
    "You are a query analysis expert. Analyze natural language queries and suggest optimal data structures.";

fn embed_document_text(document_text: &str, max_document_chars: usize) -> String {
    if document_text.chars().count() > max_document_chars {
        format!(
            "{}{}",
            truncate_chars(document_text, max_document_chars),
            DOCUMENT_TRUNCATION_MARKER
        )
    } else {
        document_text.to_string()
    }
}
