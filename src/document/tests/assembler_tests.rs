//! Tests for effective-count computation and ordered assembly.

use std::collections::BTreeMap;

use rstest::rstest;

use crate::{
    capture::DocumentId,
    document::{AssemblyError, DocumentAssembler, DocumentMetadata, FragmentMap},
    fragment::{DecodedFragment, FragmentId},
};

fn resolved(ids: impl IntoIterator<Item = u32>) -> BTreeMap<FragmentId, DecodedFragment> {
    ids.into_iter()
        .map(|id| {
            let mut fragment = DecodedFragment::new(FragmentId::new(id), format!("f{id}"));
            fragment
                .resolve_with(|text| Ok::<_, ()>(text.to_owned()))
                .expect("identity resolution");
            (FragmentId::new(id), fragment)
        })
        .collect()
}

fn assemble(
    declared: u32,
    fragments: &BTreeMap<FragmentId, DecodedFragment>,
) -> Result<Vec<String>, AssemblyError> {
    DocumentAssembler::new(FragmentMap::new(declared))
        .assemble(
            DocumentId::from("B0"),
            DocumentMetadata::titled("T"),
            fragments,
            Vec::new(),
        )
        .map(|doc| doc.body().to_vec())
}

#[test]
fn tail_off_by_one_is_tolerated() {
    let fragments = resolved(0..9);
    let body = assemble(10, &fragments).expect("assemble");
    assert_eq!(body.len(), 9);
    assert_eq!(body.first().map(String::as_str), Some("f0"));
    assert_eq!(body.last().map(String::as_str), Some("f8"));
}

#[test]
fn two_missing_at_tail_is_fatal() {
    let fragments = resolved(0..8);
    assert_eq!(
        assemble(10, &fragments),
        Err(AssemblyError::MissingFragment { id: FragmentId::new(8) })
    );
}

#[test]
fn interior_gap_names_lowest_missing_id() {
    let fragments = resolved([0, 1, 3, 5, 6, 7]);
    assert_eq!(
        assemble(8, &fragments),
        Err(AssemblyError::MissingFragment { id: FragmentId::new(2) })
    );
}

#[rstest]
#[case(0, vec![], 0)]
#[case(1, vec![], 0)]
#[case(3, vec![0, 1, 2], 3)]
#[case(3, vec![0, 1], 2)]
fn effective_count_cases(#[case] declared: u32, #[case] ids: Vec<u32>, #[case] expected: u32) {
    let assembler = DocumentAssembler::new(FragmentMap::new(declared));
    assert_eq!(assembler.effective_count(&resolved(ids)), expected);
}

#[test]
fn fragments_beyond_declared_count_are_ignored() {
    let body = assemble(2, &resolved(0..5)).expect("assemble");
    assert_eq!(body, ["f0", "f1"]);
}

#[test]
fn unresolved_fragment_is_rejected() {
    let mut fragments = resolved([0]);
    fragments.insert(FragmentId::new(1), DecodedFragment::new(FragmentId::new(1), "raw"));
    fragments.extend(resolved([2]));
    assert_eq!(
        assemble(3, &fragments),
        Err(AssemblyError::Unresolved { id: FragmentId::new(1) })
    );
}
