pub mod cheapest_arc;
