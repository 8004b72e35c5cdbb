//! Purchase document checklist, personalised by buyer profile and property status.

use crate::error::CalcError;
use crate::types::{Bank, BuyerType, ChecklistInputs, DocumentChecklist, ResidenceStatus};

fn docs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

pub fn is_uae_national(nationality: &str) -> bool {
    matches!(
        nationality.trim().to_ascii_uppercase().as_str(),
        "UAE" | "AE" | "EMIRATI" | "UNITED ARAB EMIRATES"
    )
}

fn identity(national: bool, residence: ResidenceStatus) -> Vec<String> {
    let mut d = docs(&["Passport copy"]);
    if residence == ResidenceStatus::UaeResident {
        d.extend(docs(&["UAE Residence Visa copy", "Emirates ID copy"]));
    }
    if national {
        d.extend(docs(&["UAE National ID copy", "Family Book copy"]));
    } else {
        d.push("Home country ID copy".to_string());
    }
    d
}

fn income_proof(buyer: BuyerType) -> Vec<String> {
    match buyer {
        BuyerType::Salaried => docs(&[
            "Salary certificate (less than 1 month old)",
            "Last 6 months bank statements showing salary credits",
            "Employment contract",
            "Labor contract from Ministry of Labor (if applicable)",
        ]),
        BuyerType::SelfEmployed => docs(&[
            "Trade license copy",
            "Memorandum of Association",
            "Last 2 years audited financial statements",
            "Last 6 months personal and company bank statements",
            "Proof of business ownership",
        ]),
        BuyerType::Investor => docs(&[
            "Proof of investments (shares, bonds, etc.)",
            "Last 6 months investment account statements",
            "Last 6 months personal bank statements",
        ]),
        BuyerType::Other => docs(&["Proof of income", "Last 6 months bank statements"]),
    }
}

fn property(i: &ChecklistInputs) -> Vec<String> {
    let mut d = Vec::new();
    if i.off_plan {
        d.extend(docs(&[
            "Sale and Purchase Agreement (SPA)",
            "Reservation form",
            "Developer payment plan",
            "Proof of payments made to developer",
            "OQOOD pre-registration receipt",
        ]));
    }
    if i.ready {
        d.extend(docs(&[
            "Title deed copy (if available)",
            "DEWA connection proof",
            "Service charge payment receipts",
            "NOC from developer for resale",
            "Property layout/floor plan",
        ]));
    }
    if i.mortgage_required {
        d.push("Property valuation report".to_string());
    }
    d
}

fn bank(i: &ChecklistInputs) -> Vec<String> {
    if !i.mortgage_required {
        return Vec::new();
    }
    let mut d = docs(&[
        "Mortgage application form",
        "Mortgage pre-approval letter",
        "Life insurance application",
        "Property insurance application",
    ]);
    let name = i.bank.and_then(|b| b.name()).unwrap_or("Bank");
    d.push(format!("{name} account statement (if existing customer)"));
    d.push(format!("{name} specific forms"));
    d
}

fn visa(national: bool, residence: ResidenceStatus) -> Vec<String> {
    match (national, residence) {
        (true, _) => Vec::new(),
        (false, ResidenceStatus::UaeResident) => {
            docs(&["UAE Residence Visa copy", "Entry stamp page copy"])
        }
        (false, ResidenceStatus::NonResident) => docs(&[
            "Visit visa copy (if in UAE)",
            "Entry stamp page copy (if in UAE)",
        ]),
    }
}

fn additional(i: &ChecklistInputs) -> Vec<String> {
    let mut d = docs(&["Signed DLD transfer forms", "Manager's cheque for DLD fees"]);
    if i.mortgage_required {
        d.extend(docs(&[
            "Manager's cheque for down payment",
            "Credit card statement (if applicable)",
            "Liability letter from existing banks",
        ]));
    }
    if i.buyer_type == BuyerType::SelfEmployed {
        d.extend(docs(&[
            "Power of Attorney (if applicable)",
            "Board resolution for property purchase (if company purchase)",
        ]));
    }
    if i.off_plan {
        d.push("Escrow account details".to_string());
    }
    d
}

fn notes(i: &ChecklistInputs, national: bool) -> Vec<String> {
    let mut n = Vec::new();
    let nationality = if national {
        String::new()
    } else {
        format!(" with {} nationality", i.nationality.trim())
    };
    n.push(format!(
        "Checklist for a {} buyer{nationality}.",
        i.buyer_type
    ));
    if i.mortgage_required {
        let lender = i.bank.and_then(|b| b.name()).unwrap_or("your bank");
        n.push(format!(
            "Mortgage documents for {lender} should be less than 1 month old unless stated otherwise. \
             Pre-approval typically takes 3-5 working days, final approval 7-10."
        ));
    }
    if i.residence_status == ResidenceStatus::NonResident {
        n.push(
            "Non-resident buyers may need extra documents from their home country. Foreign \
             documents must be attested by the UAE embassy there and the UAE Ministry of Foreign Affairs."
                .to_string(),
        );
    }
    n.push(
        "Authorities, the developer or the bank may still ask for further documents.".to_string(),
    );
    n
}

pub fn generate_checklist(inputs: &ChecklistInputs) -> Result<DocumentChecklist, CalcError> {
    if inputs.nationality.trim().is_empty() {
        return Err(CalcError::invalid("nationality", "is required"));
    }
    if inputs.bank.is_some() && !inputs.mortgage_required {
        return Err(CalcError::invalid("bank", "only applies when a mortgage is required"));
    }
    let national = is_uae_national(&inputs.nationality);

    Ok(DocumentChecklist {
        identity: identity(national, inputs.residence_status),
        income_proof: income_proof(inputs.buyer_type),
        property: property(inputs),
        bank: bank(inputs),
        visa: visa(national, inputs.residence_status),
        additional: additional(inputs),
        notes: notes(inputs, national),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ChecklistInputs {
        ChecklistInputs {
            buyer_type: BuyerType::Salaried,
            nationality: "India".to_string(),
            residence_status: ResidenceStatus::UaeResident,
            mortgage_required: false,
            bank: None,
            off_plan: false,
            ready: true,
        }
    }

    fn has(list: &[String], doc: &str) -> bool {
        list.iter().any(|d| d == doc)
    }

    // ---------- Identity and visa ----------

    #[test]
    fn resident_expat_identity_and_visa() {
        let c = generate_checklist(&profile()).unwrap();
        assert_eq!(
            c.identity,
            docs(&["Passport copy", "UAE Residence Visa copy", "Emirates ID copy", "Home country ID copy"])
        );
        assert_eq!(c.visa, docs(&["UAE Residence Visa copy", "Entry stamp page copy"]));
    }

    #[test]
    fn non_resident_expat_needs_visit_visa_and_attestation_note() {
        let mut i = profile();
        i.residence_status = ResidenceStatus::NonResident;
        let c = generate_checklist(&i).unwrap();
        assert_eq!(c.identity, docs(&["Passport copy", "Home country ID copy"]));
        assert!(has(&c.visa, "Visit visa copy (if in UAE)"));
        assert!(c.notes.iter().any(|n| n.contains("attested")));
        assert!(c.notes[0].contains("with India nationality"));
    }

    #[test]
    fn uae_national_has_family_book_and_no_visa_section() {
        let mut i = profile();
        i.nationality = " emirati ".to_string();
        let c = generate_checklist(&i).unwrap();
        assert!(has(&c.identity, "Family Book copy"));
        assert!(!has(&c.identity, "Home country ID copy"));
        assert!(c.visa.is_empty());
        assert!(!c.notes[0].contains("nationality"));
    }

    // ---------- Income proof ----------

    #[test]
    fn income_proof_per_buyer_type() {
        let count = |b: BuyerType| income_proof(b).len();
        assert_eq!(count(BuyerType::Salaried), 4);
        assert_eq!(count(BuyerType::SelfEmployed), 5);
        assert_eq!(count(BuyerType::Investor), 3);
        assert_eq!(income_proof(BuyerType::Other), docs(&["Proof of income", "Last 6 months bank statements"]));
    }

    #[test]
    fn self_employed_gets_company_paperwork() {
        let mut i = profile();
        i.buyer_type = BuyerType::SelfEmployed;
        let c = generate_checklist(&i).unwrap();
        assert!(has(&c.income_proof, "Trade license copy"));
        assert!(has(&c.additional, "Power of Attorney (if applicable)"));
        assert!(c.notes[0].contains("self-employed buyer"));
    }

    // ---------- Property status ----------

    #[test]
    fn off_plan_and_ready_lists() {
        let mut i = profile();
        i.off_plan = true;
        i.ready = false;
        let c = generate_checklist(&i).unwrap();
        assert!(has(&c.property, "OQOOD pre-registration receipt"));
        assert!(!has(&c.property, "DEWA connection proof"));
        assert!(has(&c.additional, "Escrow account details"));

        let c = generate_checklist(&profile()).unwrap();
        assert!(has(&c.property, "DEWA connection proof"));
        assert!(!has(&c.additional, "Escrow account details"));
    }

    // ---------- Mortgage ----------

    #[test]
    fn cash_buyer_has_no_bank_section() {
        let c = generate_checklist(&profile()).unwrap();
        assert!(c.bank.is_empty());
        assert!(!has(&c.property, "Property valuation report"));
        assert_eq!(c.additional.len(), 2);
        assert_eq!(c.notes.len(), 2);
    }

    #[test]
    fn named_lender_gets_its_own_forms() {
        let mut i = profile();
        i.mortgage_required = true;
        i.bank = Some(Bank::Adcb);
        let c = generate_checklist(&i).unwrap();
        assert!(has(&c.bank, "ADCB specific forms"));
        assert!(has(&c.property, "Property valuation report"));
        assert!(has(&c.additional, "Liability letter from existing banks"));
        assert!(c.notes.iter().any(|n| n.contains("for ADCB")));
    }

    #[test]
    fn unnamed_lender_gets_generic_forms() {
        let mut i = profile();
        i.mortgage_required = true;
        for bank in [None, Some(Bank::Other)] {
            i.bank = bank;
            let c = generate_checklist(&i).unwrap();
            assert!(has(&c.bank, "Bank specific forms"));
            assert!(c.notes.iter().any(|n| n.contains("for your bank")));
        }
    }

    #[test]
    fn document_count_spans_all_sections() {
        let c = generate_checklist(&profile()).unwrap();
        // 4 identity + 4 income + 5 property + 0 bank + 2 visa + 2 additional
        assert_eq!(c.document_count(), 17);
    }

    // ---------- Rejections ----------

    #[test]
    fn rejects_blank_nationality_and_bank_without_mortgage() {
        let mut i = profile();
        i.nationality = "  ".to_string();
        assert_eq!(generate_checklist(&i).unwrap_err().field(), "nationality");
        let mut i = profile();
        i.bank = Some(Bank::Dib);
        assert_eq!(generate_checklist(&i).unwrap_err().field(), "bank");
    }
}
