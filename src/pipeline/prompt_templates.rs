//! Prompt templates for the general (non-specialist) workflow steps.
//!
//! Templates are plain string builders. Anything that asks the model for
//! structured output spells out the JSON keys the matching parser expects.

// ═══════════════════════════════════════════════════════════
// Classification prompts
// ═══════════════════════════════════════════════════════════

/// Yes/No relevance check used by the triage gate.
pub fn relevance_prompt(input: &str) -> String {
    format!(
        "You are a medical assistant. Analyze the following input and determine if it is medically relevant or not.\n\
         \n\
         Respond ONLY with:\n\
         - \"Yes\" if it's clearly about a symptom, health issue, diagnosis, treatment, or medical concern\n\
         - \"No\" otherwise.\n\
         \n\
         Input: \"{input}\"\n"
    )
}

/// Intent classification with a fixed JSON schema.
pub fn intent_prompt(input: &str) -> String {
    format!(
        "You are a medical AI coordinator. Analyze the following user input and determine:\n\
         \n\
         1. Primary intent (diagnosis, treatment, monitoring, reporting, emergency, general)\n\
         2. Urgency level (low, medium, high, emergency)\n\
         3. Required specialist consultation (general, cardiology, neurology, pharmacology, etc.)\n\
         4. Patient data needed (symptoms, history, vitals, medications)\n\
         \n\
         User Input: \"{input}\"\n\
         \n\
         Respond in JSON format:\n\
         {{\n\
         \x20   \"intent\": \"diagnosis|treatment|monitoring|reporting|emergency|general\",\n\
         \x20   \"urgency\": \"low|medium|high|emergency\",\n\
         \x20   \"specialists\": [\"general\", \"cardiology\", \"neurology\", \"pharmacology\"],\n\
         \x20   \"data_needed\": [\"symptoms\", \"history\", \"vitals\", \"medications\"],\n\
         \x20   \"workflow_steps\": [\"step1\", \"step2\", \"step3\"]\n\
         }}\n"
    )
}

/// Hazard assessment of a proposed treatment plan.
pub fn safety_prompt(symptoms: &str, diagnosis: &str, treatment: &str) -> String {
    format!(
        "You are a medical safety validator. Analyze this treatment plan for potential safety concerns:\n\
         \n\
         Symptoms: {symptoms}\n\
         Diagnosis: {diagnosis}\n\
         Treatment: {treatment}\n\
         \n\
         Check for:\n\
         1. Dangerous drug interactions\n\
         2. Contraindications\n\
         3. Dosing errors\n\
         4. Missing critical warnings\n\
         5. Emergency symptoms that need immediate care\n\
         \n\
         Respond with JSON:\n\
         {{\n\
         \x20   \"safe\": true/false,\n\
         \x20   \"warning\": \"description if unsafe\",\n\
         \x20   \"risk_level\": \"low|medium|high|critical\"\n\
         }}\n"
    )
}

/// Emergency-medicine triage with a fixed JSON schema.
pub fn emergency_triage_prompt(symptoms: &str) -> String {
    format!(
        "You are an emergency medicine physician conducting initial triage.\n\
         \n\
         Patient Symptoms: {symptoms}\n\
         \n\
         Assess urgency level and provide a triage decision:\n\
         \n\
         1. Urgency Level: IMMEDIATE (life-threatening, <15 minutes), URGENT (serious but stable, <1 hour), \
         LESS URGENT (stable, <4 hours), NON-URGENT (routine care)\n\
         2. Red Flag Assessment: life-threatening features, vital sign concerns, neurological or cardiovascular emergencies\n\
         3. Disposition: emergency department immediately, urgent care center, primary care same day, routine appointment\n\
         4. Immediate Actions: when to call 911, first aid measures, what NOT to do, information to gather\n\
         \n\
         Respond in JSON format:\n\
         {{\n\
         \x20   \"urgency\": \"IMMEDIATE|URGENT|LESS_URGENT|NON_URGENT\",\n\
         \x20   \"disposition\": \"911|ED|URGENT_CARE|PRIMARY_CARE\",\n\
         \x20   \"red_flags\": [\"flag1\", \"flag2\"],\n\
         \x20   \"immediate_actions\": [\"action1\", \"action2\"]\n\
         }}\n"
    )
}

// ═══════════════════════════════════════════════════════════
// Generation prompts
// ═══════════════════════════════════════════════════════════

pub fn diagnosis_prompt(symptoms: &str) -> String {
    format!(
        "You are an expert medical assistant. Read the following patient input and provide a detailed possible diagnosis.\n\
         \n\
         Patient input: \"{symptoms}\"\n\
         \n\
         Return the response in a human-friendly paragraph.\n"
    )
}

pub fn treatment_prompt(symptoms: &str, diagnosis: &str) -> String {
    format!(
        "You are a medical treatment recommendation assistant.\n\
         A patient presents with:\n\
         - Symptoms: {symptoms}\n\
         - Diagnosis: {diagnosis}\n\
         \n\
         Generate a clear, formatted treatment plan using markdown-like structure. Include the following sections:\n\
         \n\
         1. Primary Medication: drug names, dosage and frequencies (e.g., \"Acetaminophen 325mg every 6 hours\").\n\
         2. Duration and Instructions: how long to take each medication, timing, with/without food, etc.\n\
         3. Non-Pharmacological Advice: lifestyle changes, hydration, diet, etc.\n\
         4. Recommended Tests (if any): only if relevant.\n\
         5. Follow-Up: what should be done next.\n\
         \n\
         Avoid:\n\
         - References or citations\n\
         - Confidence scores or disclaimers\n\
         - Vague generalizations\n"
    )
}

/// Trend summary over rendered vitals records.
pub fn monitoring_summary_prompt(records: &str) -> String {
    format!(
        "You are a medical assistant. Analyze the following health logs and summarize the patient's current condition.\n\
         \n\
         {records}\n\
         \n\
         Provide any patterns, improvements, or worsening symptoms. \
         Also provide further guidelines and recommendations to the patient based on their health.\n"
    )
}

pub fn medical_qa_prompt(question: &str) -> String {
    format!(
        "You are a medical expert. Answer the following question clearly and concisely:\n\
         \n\
         Question: {question}\n\
         Answer:"
    )
}
