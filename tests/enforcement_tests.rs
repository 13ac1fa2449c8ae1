//! End-to-end enforcement behaviour through the public library API

use std::sync::Arc;

use termforce::terminology::{
    EnforcementAudit, GlossaryEntry, GlossaryTermSet, TerminologyEnforcer, applicable_terms,
    enforce, mask, preserve_case, unmask,
};

fn term_set(pairs: &[(&str, &str)]) -> GlossaryTermSet {
    GlossaryTermSet::from_entries(
        pairs
            .iter()
            .filter_map(|(source, target)| GlossaryEntry::new(source, target)),
    )
}

fn it_glossary() -> GlossaryTermSet {
    term_set(&[
        ("incident", "incident"),
        ("critical incident", "kritiek incident"),
        ("problem", "probleem"),
        ("service desk", "servicedesk"),
        ("service", "dienst"),
        ("change request", "wijzigingsverzoek"),
        ("$variable", "$variabele"),
        ("C++", "C++"),
    ])
}

#[test]
fn test_no_applicable_terms_is_identity() {
    let terms = it_glossary();
    let texts = [
        "",
        "Nothing to see here.",
        "An incidental remark about servicing",
        "Unicode: 日本語のテキスト",
    ];

    for text in texts {
        let mut audit = EnforcementAudit::new(text);
        assert_eq!(enforce(text, &terms, Some(&mut audit)), text);
        assert!(audit.applied_terms().is_empty(), "unexpected match in {text:?}");
    }
}

#[test]
fn test_longest_first_records_one_application() {
    let terms = it_glossary();
    let mut audit = EnforcementAudit::new("We have a critical incident");

    let result = enforce("We have a critical incident", &terms, Some(&mut audit));

    assert_eq!(result, "We have a kritiek incident");
    assert_eq!(audit.applied_terms().len(), 1);
    assert_eq!(audit.applied_terms()[0].source_term, "critical incident");
}

#[test]
fn test_word_boundary_exclusion() {
    let terms = term_set(&[("incident", "voorval")]);
    let result = enforce("An incidental incident occurred", &terms, None);
    assert_eq!(result, "An incidental voorval occurred");
}

#[test]
fn test_case_preservation_examples() {
    assert_eq!(preserve_case("PROBLEM", "probleem"), "PROBLEEM");
    assert_eq!(preserve_case("Problem", "probleem"), "Probleem");
    assert_eq!(preserve_case("problem", "probleem"), "probleem");
}

#[test]
fn test_service_desk_scenario() {
    let terms = it_glossary();
    let text = "Contact the Service Desk for service issues";
    let mut audit = EnforcementAudit::new(text);

    let result = enforce(text, &terms, Some(&mut audit));
    audit.set_enforced_text(result.clone());

    assert_eq!(result, "Contact the Servicedesk for dienst issues");

    let summary = audit.summary();
    assert_eq!(summary.total_replacements, 2);
    assert_eq!(summary.unique_terms, 2);

    let mut positions: Vec<(usize, &str)> = summary
        .replacements
        .iter()
        .map(|r| (r.position, r.original_text.as_str()))
        .collect();
    positions.sort();
    assert_eq!(positions, [(12, "Service Desk"), (29, "service")]);

    for (position, original) in positions {
        let found: String = text.chars().skip(position).take(original.chars().count()).collect();
        assert_eq!(found, original);
    }
}

#[test]
fn test_symbol_terms_match_with_boundaries() {
    let terms = it_glossary();
    assert_eq!(
        enforce("Set $variable before using C++ here", &terms, None),
        "Set $variabele before using C++ here"
    );
    assert_eq!(enforce("a$variable", &terms, None), "a$variable");
}

#[test]
fn test_applied_spans_never_overlap() {
    let terms = term_set(&[
        ("critical incident", "kritiek incident"),
        ("incident report", "incidentrapport"),
        ("incident", "voorval"),
        ("report", "rapport"),
        ("service desk", "servicedesk"),
        ("desk", "bureau"),
        ("service", "dienst"),
    ]);
    let texts = [
        "critical incident report",
        "The critical incident report went to the service desk, not the desk.",
        "INCIDENT incident Incident report REPORT",
        "desk service desk service",
        "service-desk/service_desk",
    ];

    for text in texts {
        let mut audit = EnforcementAudit::new(text);
        enforce(text, &terms, Some(&mut audit));

        let mut spans: Vec<(usize, usize)> = audit
            .applied_terms()
            .iter()
            .map(|a| (a.position, a.position + a.original_text.chars().count()))
            .collect();
        spans.sort();

        for pair in spans.windows(2) {
            assert!(
                pair[0].1 <= pair[1].0,
                "overlapping spans {:?} and {:?} in {text:?}",
                pair[0],
                pair[1]
            );
        }
    }
}

#[test]
fn test_mask_round_trip_matches_post_hoc() {
    // Symbol-edged targets decide the boundaries later entries see.
    let symbols = term_set(&[("C++", "C#"), ("-x", "Y"), ("$variable", "$var"), ("var-", "v")]);
    let cases = [
        (it_glossary(), "Contact the Service Desk for service issues"),
        (it_glossary(), "A CRITICAL INCIDENT and a Problem with the change request"),
        (it_glossary(), "no terms at all"),
        (symbols.clone(), "C++-x"),
        (symbols.clone(), "use C++ -x and $variable-x"),
        (symbols, "var-$variable"),
    ];

    for (terms, text) in &cases {
        let masked = mask(text, terms, "__GLOSS_");
        // identity translation
        let outcome = unmask(&masked.text, &masked, None);

        assert!(outcome.is_complete(), "incomplete restore for {text:?}");
        assert_eq!(outcome.text, enforce(text, terms, None), "diverged on {text:?}");
    }
}

#[test]
fn test_mask_picks_post_hoc_spans_next_to_symbols() {
    let terms = term_set(&[("C++", "C#"), ("-x", "Y")]);

    assert_eq!(enforce("C++-x", &terms, None), "C#y");

    let masked = mask("C++-x", &terms, "__GLOSS_");
    assert_eq!(masked.text, "__GLOSS_0____GLOSS_1__");
    assert_eq!(masked.placeholders[1].matched_text, "-x");
    assert_eq!(masked.placeholders[1].position, 3);
    assert_eq!(unmask(&masked.text, &masked, None).text, "C#y");
}

#[test]
fn test_unmask_survives_reordered_translation() {
    let terms = it_glossary();
    let masked = mask("The problem reached the service desk", &terms, "__GLOSS_");
    assert_eq!(masked.placeholders.len(), 2);

    let desk = &masked.placeholders[0].token;
    let problem = &masked.placeholders[1].token;
    let translated = format!("De {desk} kreeg het {problem}");

    let outcome = unmask(&translated, &masked, None);
    assert_eq!(outcome.text, "De servicedesk kreeg het probleem");
    assert_eq!(outcome.restored, 2);
}

#[test]
fn test_shared_enforcer_across_threads() {
    let enforcer = TerminologyEnforcer::new(Arc::new(it_glossary()));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let enforcer = enforcer.clone();
            std::thread::spawn(move || {
                let text = format!("Ticket {i}: the Problem is a critical incident");
                enforcer.enforce_audited(&text)
            })
        })
        .collect();

    for handle in handles {
        let (result, audit) = handle.join().unwrap();
        assert!(result.ends_with("the Probleem is a kritiek incident"));
        assert_eq!(audit.applied_terms().len(), 2);
        assert_eq!(audit.enforced_text(), result);
    }
}

#[test]
fn test_applicable_terms_in_precedence_order() {
    let terms = it_glossary();
    let found: Vec<&str> = applicable_terms("the critical incident with the service", &terms)
        .iter()
        .map(|e| e.source())
        .collect();
    assert_eq!(found, ["critical incident", "incident", "service"]);
}
