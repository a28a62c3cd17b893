use shared_models::care::DiseaseSeed;

const fn disease(name: &'static str, category: &'static str, description: &'static str) -> DiseaseSeed {
    DiseaseSeed {
        name,
        category,
        description,
    }
}

/// Reference list seeded into the disease catalog at startup.
pub const DISEASE_CATALOG: [DiseaseSeed; 20] = [
    disease("Diabetes Type 1", "Chronic", "Autoimmune condition where the pancreas produces little or no insulin"),
    disease("Diabetes Type 2", "Chronic", "Metabolic disorder characterized by high blood sugar"),
    disease("Hypertension", "Chronic", "High blood pressure, a long-term medical condition"),
    disease("Asthma", "Chronic", "Chronic inflammatory disease of the airways"),
    disease("COPD", "Chronic", "Chronic Obstructive Pulmonary Disease"),
    disease("Heart Disease", "Chronic", "Various conditions affecting the heart"),
    disease("Arthritis", "Chronic", "Inflammation of one or more joints"),
    disease("Osteoporosis", "Chronic", "Bone disease that occurs when bone mineral density decreases"),
    disease("Chronic Kidney Disease", "Chronic", "Progressive loss of kidney function over time"),
    disease("Depression", "Mental Health", "Mood disorder causing persistent sadness"),
    disease("Anxiety Disorder", "Mental Health", "Mental health disorder characterized by excessive worry"),
    disease("Epilepsy", "Neurological", "Central nervous system disorder causing seizures"),
    disease("Migraine", "Neurological", "Recurrent headaches often accompanied by nausea"),
    disease("Thyroid Disease", "Endocrine", "Disorders affecting the thyroid gland"),
    disease("Obesity", "Metabolic", "Excessive body fat accumulation"),
    disease("Anemia", "Hematological", "Condition with reduced red blood cells or hemoglobin"),
    disease("Hepatitis", "Infectious", "Inflammation of the liver"),
    disease("HIV/AIDS", "Infectious", "Viral infection affecting the immune system"),
    disease("Tuberculosis", "Infectious", "Bacterial infection primarily affecting the lungs"),
    disease("Cancer", "Oncological", "Group of diseases involving abnormal cell growth"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_are_unique() {
        let names: HashSet<_> = DISEASE_CATALOG.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), DISEASE_CATALOG.len());
    }
}
