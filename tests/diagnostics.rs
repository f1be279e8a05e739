use insta::assert_snapshot;

use tearcheck::Violation;

/// Tests of the violation diagnostics shown on a failed run.

#[test]
fn field_mismatch_names_field_values_and_iteration() {
    let violation = Violation::FieldMismatch {
        iteration: 41,
        field: "department",
        observed: "Programmers".to_owned(),
        expected: "Accounting".to_owned(),
    };
    assert_snapshot!(
        violation.to_string(),
        @"iteration 41: mismatching 'department', Programmers != Accounting"
    );
}

#[test]
fn numeric_mismatch_reads_the_same_way() {
    let violation = Violation::FieldMismatch {
        iteration: 59_999,
        field: "id_code",
        observed: "87654321".to_owned(),
        expected: "12345678".to_owned(),
    };
    assert_snapshot!(
        violation.to_string(),
        @"iteration 59999: mismatching 'id_code', 87654321 != 12345678"
    );
}

#[test]
fn unknown_identity_is_reported_as_an_inconsistency() {
    let violation = Violation::UnknownIdentity {
        iteration: 3,
        identity_number: 7,
    };
    assert_snapshot!(
        violation.to_string(),
        @"iteration 3: identity number 7 has no directory entry"
    );
}
