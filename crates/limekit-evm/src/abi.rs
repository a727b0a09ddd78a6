//! Contract ABI definitions using alloy's `sol!` macro.

use alloy::sol;

sol! {
    /// Library contract. Also mints and burns the LIB token it is paired with.
    interface ILibrary {
        function owner() external view returns (address);
        function addBook(uint256 id, string name, uint256 copies) external;
        function addCopies(uint256 id, uint256 copies) external;
        function removeBook(uint256 id) external;
        /// Borrows one copy.
        function getBook(uint256 id) external;
        function returnBook(uint256 id) external;
        function getCustomerRecord() external view returns (uint256[]);
        function books(uint256 bookId) external view returns (uint256 id, string name, uint256 copies);
        function wrap() external payable;
        function unwrap(uint256 value) external;
        function withdrawMoney() external;
        function wrapWithSignature(bytes32 hashedMessage, uint8 v, bytes32 r, bytes32 s, address signer) external payable;
    }
}

sol! {
    /// ERC-20 token interface.
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
    }
}

sol! {
    /// US election contract.
    interface IUSElection {
        struct StateResult {
            string name;
            uint256 votesBiden;
            uint256 votesTrump;
            uint8 stateSeats;
        }

        event LogStateResult(uint8 winner, uint8 stateSeats, string state);
        event LogElectionEnded(uint8 winner);

        function currentLeader() external view returns (uint8);
        function submitStateResult(StateResult result) external;
        function endElection() external;
        function resultsSubmitted(string state) external view returns (bool);
    }
}
