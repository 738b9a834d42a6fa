pub mod orbital_graph;
