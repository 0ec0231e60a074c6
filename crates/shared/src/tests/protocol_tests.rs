use super::*;

#[test]
fn default_params_serialize_to_empty_address() {
    assert_eq!(QueryParams::default().to_query_string(), "");
}

#[test]
fn non_default_params_are_written_and_read_back() {
    let params = QueryParams {
        search: "running shoe".to_string(),
        sort: SortOption::PriceDesc,
        page: 3,
        limit: 8,
    };
    let encoded = params.to_query_string();
    assert_eq!(encoded, "search=running+shoe&sort=price-desc&page=3");
    assert_eq!(QueryParams::from_query_string(&encoded), params);
    assert_eq!(QueryParams::from_query_string(&format!("?{encoded}")), params);
}

#[test]
fn limit_is_omitted_relative_to_the_given_default() {
    let params = QueryParams::with_limit(8).with_search("hat");
    assert_eq!(params.to_query_string(), "search=hat");
    assert_eq!(
        params.to_query_string_with_default_limit(4),
        "search=hat&limit=8"
    );
    let small = QueryParams::with_limit(4);
    assert_eq!(small.to_query_string_with_default_limit(4), "");
    assert_eq!(small.to_query_string(), "limit=4");
}

#[test]
fn missing_parameters_take_defaults() {
    let params = QueryParams::from_query_string("sort=price-asc");
    assert_eq!(params.search, "");
    assert_eq!(params.sort, SortOption::PriceAsc);
    assert_eq!(params.page, DEFAULT_PAGE);
    assert_eq!(params.limit, DEFAULT_LIMIT);
}

#[test]
fn invalid_numeric_parameters_are_coerced_to_defaults() {
    let params = QueryParams::from_query_string("page=0&limit=-4");
    assert_eq!(params.page, 1);
    assert_eq!(params.limit, 8);

    let params = QueryParams::from_query_string("page=abc&limit=");
    assert_eq!(params.page, 1);
    assert_eq!(params.limit, 8);

    let params = QueryParams::from_query_string("page=99999999999");
    assert_eq!(params.page, u32::MAX);
}

#[test]
fn unknown_sort_degrades_to_recent() {
    assert_eq!(SortOption::from_param("cheapest"), SortOption::Recent);
    assert_eq!(
        QueryParams::from_query_string("sort=nope").sort,
        SortOption::Recent
    );
}

#[test]
fn first_occurrence_of_repeated_parameter_wins() {
    let params = QueryParams::from_query_string("page=2&page=5");
    assert_eq!(params.page, 2);
}

#[test]
fn search_and_sort_changes_reset_page() {
    let params = QueryParams::default().with_page(4);
    assert_eq!(params.with_search("hat").page, 1);
    assert_eq!(params.with_sort(SortOption::PriceAsc).page, 1);
    let paged = params.with_search("hat").with_page(2);
    assert_eq!(paged.search, "hat");
    assert_eq!(paged.page, 2);
}

#[test]
fn sort_vocabulary_matches_labels() {
    let options = sort_options();
    let labels: Vec<_> = options.iter().map(|o| (o.value.as_str(), o.label)).collect();
    assert_eq!(
        labels,
        vec![
            ("recent", "Most Recent"),
            ("price-asc", "Price: Low to High"),
            ("price-desc", "Price: High to Low"),
        ]
    );
}

#[test]
fn paginated_result_uses_camel_case_on_the_wire() {
    let result: PaginatedResult<u8> = PaginatedResult {
        data: vec![1, 2],
        total: 10,
        page: 1,
        limit: 2,
        total_pages: 5,
    };
    let json = serde_json::to_value(&result).expect("json");
    assert_eq!(json["totalPages"], 5);
    assert!(result.has_next_page());
    assert!(!result.has_previous_page());
}
